use std::{fmt::Debug, ptr, ptr::NonNull};

use crate::{ComingFrom, Node, NodePtr};

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Node {
            parent: None,
            right: None,
            left: None,
            balance: 0,
            key,
            value,
        }
    }

    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Attach `node` under `parent` on the given side.
    ///
    /// # Safety
    ///
    /// `node` must be valid, unaliased and unlinked; `parent` must be a
    /// live node with a free slot on `direction`'s side.
    pub(crate) unsafe fn link(node: NonNull<Self>, mut parent: NonNull<Self>, direction: ComingFrom) {
        // Finish writing node's fields before taking a &mut to parent so
        // the two borrows never overlap.
        {
            // SAFETY: node is valid and unaliased by the caller's contract.
            let node = unsafe { &mut *node.as_ptr() };
            node.parent = Some(parent);
            node.left = None;
            node.right = None;
        }
        // SAFETY: parent is live; the node borrow above has ended.
        let parent = unsafe { parent.as_mut() };
        match direction {
            ComingFrom::Left => parent.left = Some(node),
            ComingFrom::Right => parent.right = Some(node),
        }
    }

    /// In-order successor: leftmost of the right subtree, or the first
    /// ancestor reached through a left-child edge.
    pub(crate) fn next(&self) -> NodePtr<K, V> {
        if let Some(mut current) = self.right {
            // SAFETY: child links of a live tree point at live nodes.
            while let Some(left) = unsafe { current.as_ref() }.left {
                current = left;
            }
            return Some(current);
        }

        let mut node: *const Node<K, V> = self;
        let mut parent = self.parent;
        while let Some(p) = parent {
            // SAFETY: parent links of a live tree point at live nodes.
            let p = unsafe { p.as_ref() };
            if !p.right.is_some_and(|right| ptr::eq(right.as_ptr(), node)) {
                // node hangs off p's left side, so p comes right after it.
                break;
            }
            node = p;
            parent = p.parent;
        }
        parent
    }

    /// In-order predecessor, the mirror of [`Self::next`].
    pub(crate) fn prev(&self) -> NodePtr<K, V> {
        if let Some(mut current) = self.left {
            // SAFETY: child links of a live tree point at live nodes.
            while let Some(right) = unsafe { current.as_ref() }.right {
                current = right;
            }
            return Some(current);
        }

        let mut node: *const Node<K, V> = self;
        let mut parent = self.parent;
        while let Some(p) = parent {
            // SAFETY: parent links of a live tree point at live nodes.
            let p = unsafe { p.as_ref() };
            if !p.left.is_some_and(|left| ptr::eq(left.as_ptr(), node)) {
                break;
            }
            node = p;
            parent = p.parent;
        }
        parent
    }
}

impl<K, V> Debug for Node<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{:+}::({:?},{:?})",
            self.balance, self.key, self.value
        ))
    }
}
