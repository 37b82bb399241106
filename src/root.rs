use std::{cmp, mem, ptr::NonNull};

use crate::{Node, NodePtr, NodePtrExt, Root};

/// Height of a subtree: 0 for a missing node, otherwise 1 plus the taller
/// child. Recomputed on demand rather than cached; the rebalance walk
/// only ever asks for heights along one root-to-leaf path, so the total
/// work per edit stays within the O(log n) bound.
pub(crate) fn height<K, V>(node: NodePtr<K, V>) -> usize {
    match node {
        None => 0,
        Some(node) => {
            // SAFETY: child links of a live tree point at live nodes.
            let node = unsafe { node.as_ref() };
            1 + cmp::max(height(node.left), height(node.right))
        }
    }
}

/// Refresh `node.balance` from the current shape of its subtrees.
fn update_balance<K, V>(node: NodePtr<K, V>) {
    if let Some(mut node) = node {
        // SAFETY: the caller hands in a live node of the tree.
        let node = unsafe { node.as_mut() };
        node.balance = (height(node.right) as isize - height(node.left) as isize) as i8;
    }
}

/// Promote `a`'s right child `b` into `a`'s position.
///
/// ```text
///      a                b
///     / \              / \
///    x   b     -->    a   z
///       / \          / \
///      y   z        x   y
/// ```
///
/// `b` inherits `a`'s parent and the parent's child edge is redirected at
/// `b`; when `a` was the root, the caller rewires the tree's root instead.
/// Both touched nodes get their balance refreshed before the new local
/// root is returned.
fn rotate_left<K, V>(a: NodePtr<K, V>) -> NodePtr<K, V> {
    // a sits at +2 (or is the lower half of a double rotation), so a and
    // a.right are both present.
    let mut a = a;
    let mut b = a.right();

    b.set_parent(a.parent());
    a.set_right(b.left());
    a.right().set_parent(a);
    b.set_left(a);
    a.set_parent(b);

    let mut parent = b.parent();
    if parent.is_some() {
        if parent.right() == a {
            parent.set_right(b);
        } else {
            parent.set_left(b);
        }
    }

    update_balance(a);
    update_balance(b);
    b
}

/// Promote `a`'s left child `b` into `a`'s position; the mirror of
/// [`rotate_left`].
///
/// ```text
///        a            b
///       / \          / \
///      b   z   -->  x   a
///     / \              / \
///    x   y            y   z
/// ```
fn rotate_right<K, V>(a: NodePtr<K, V>) -> NodePtr<K, V> {
    let mut a = a;
    let mut b = a.left();

    b.set_parent(a.parent());
    a.set_left(b.right());
    a.left().set_parent(a);
    b.set_right(a);
    a.set_parent(b);

    let mut parent = b.parent();
    if parent.is_some() {
        if parent.right() == a {
            parent.set_right(b);
        } else {
            parent.set_left(b);
        }
    }

    update_balance(a);
    update_balance(b);
    b
}

/// The left subtree is too tall but itself right-heavy; a single right
/// rotation would tip it the other way, so straighten the zig-zag first.
fn rotate_left_right<K, V>(n: NodePtr<K, V>) -> NodePtr<K, V> {
    // The parent fix inside rotate_left already reseats n's left child.
    rotate_left(n.left());
    rotate_right(n)
}

/// Mirror of [`rotate_left_right`], for a right subtree that is left-heavy.
fn rotate_right_left<K, V>(n: NodePtr<K, V>) -> NodePtr<K, V> {
    rotate_right(n.right());
    rotate_left(n)
}

impl<K, V> Root<K, V> {
    pub(crate) const fn new() -> Self {
        Root { root: None }
    }

    pub(crate) fn first(&self) -> NodePtr<K, V> {
        let mut n = self.root?;
        // SAFETY: child links of a live tree point at live nodes.
        while let Some(left) = unsafe { n.as_ref() }.left {
            n = left;
        }
        Some(n)
    }

    pub(crate) fn last(&self) -> NodePtr<K, V> {
        let mut n = self.root?;
        // SAFETY: child links of a live tree point at live nodes.
        while let Some(right) = unsafe { n.as_ref() }.right {
            n = right;
        }
        Some(n)
    }

    /// Walk from `node` up to the root, refreshing balance factors and
    /// rotating wherever a subtree has tipped to ±2.
    ///
    /// Ancestor heights can shrink or grow without the ancestor itself
    /// tipping over, so the walk never stops early; whichever node roots
    /// the region after the last step becomes the tree's root.
    pub(crate) fn rebalance(&mut self, node: NodePtr<K, V>) {
        let mut node = node;
        while node.is_some() {
            update_balance(node);

            if node.balance() == -2 {
                node = if height(node.left().left()) >= height(node.left().right()) {
                    rotate_right(node)
                } else {
                    rotate_left_right(node)
                };
            } else if node.balance() == 2 {
                node = if height(node.right().right()) >= height(node.right().left()) {
                    rotate_left(node)
                } else {
                    rotate_right_left(node)
                };
            }

            match node.parent() {
                None => {
                    self.root = node;
                    break;
                }
                parent => node = parent,
            }
        }
    }

    /// Unlink the entry at `node` and return the node that was physically
    /// detached. After the two-child case the detached node is the former
    /// in-order successor, carrying the removed payload out of the tree.
    pub(crate) fn erase(&mut self, node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
        let found: NodePtr<K, V> = Some(node);

        let detach = if found.left().is_some() && found.right().is_some() {
            // Two children. The in-order successor, leftmost under the
            // right subtree, has no left child, so removing it from its
            // own slot is the one-child case below. Swapping the payloads
            // first relocates the doomed entry into that slot.
            let mut successor = found.right();
            while successor.left().is_some() {
                successor = successor.left();
            }
            // SAFETY: found and successor are distinct live nodes, so the
            // two &muts never alias.
            unsafe {
                let found = &mut *node.as_ptr();
                let successor = &mut *successor.expect("right subtree is present").as_ptr();
                mem::swap(&mut found.key, &mut successor.key);
                mem::swap(&mut found.value, &mut successor.value);
            }
            successor
        } else {
            found
        };

        // One child at most: splice that child (if any) into the detached
        // node's slot, then walk up from the former parent.
        let parent = detach.parent();
        let mut child = if detach.left().is_some() {
            detach.left()
        } else {
            detach.right()
        };
        child.set_parent(parent);
        self.change_child(detach, child, parent);
        self.rebalance(parent);

        detach.expect("detached node is the found node or its successor")
    }

    fn change_child(&mut self, old: NodePtr<K, V>, new: NodePtr<K, V>, parent: NodePtr<K, V>) {
        if let Some(mut parent) = parent {
            // SAFETY: parent is a live node of this tree.
            let parent = unsafe { parent.as_mut() };
            if parent.left == old {
                parent.left = new;
            } else {
                parent.right = new;
            }
        } else {
            self.root = new;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn height_of_missing_subtree_is_zero() {
        assert_eq!(0, height::<i32, ()>(None));
    }

    #[test]
    fn height_of_lone_node_is_one() {
        let mut node = Node::new(42, ());
        assert_eq!(1, height((&mut node).into()));
    }

    #[test]
    fn update_balance_of_lone_node_is_zero() {
        let mut node = Node::new(42, ());
        node.balance = 7;
        update_balance((&mut node).into());
        assert_eq!(0, node.balance);
    }
}
