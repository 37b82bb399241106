use std::{borrow::Borrow, cmp::Ordering::*, fmt::Debug, mem, ptr::NonNull};

use crate::{ComingFrom, Node, NodePtr, Root, Tree, alloc, root};

impl<K, V> Tree<K, V> {
    pub const fn new() -> Self {
        Tree {
            root: Root::new(),
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the whole tree, recomputed on demand. Diagnostic only.
    pub fn height(&self) -> usize {
        root::height(self.root.root)
    }

    pub fn clear(&mut self) {
        self.drop_nodes();
        self.root.root = None;
        self.len = 0;
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| {
            // SAFETY: the node stays alive and unaliased as long as &self.
            let node = unsafe { node.as_ref() };
            (node.key(), node.value())
        })
    }

    pub fn first(&self) -> Option<&V> {
        // SAFETY: the node stays alive and unaliased as long as &self.
        self.root.first().map(|e| unsafe { e.as_ref() }.value())
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.first().map(|e| {
            // SAFETY: the node stays alive and unaliased as long as &self.
            let e = unsafe { e.as_ref() };
            (e.key(), e.value())
        })
    }

    pub fn last(&self) -> Option<&V> {
        // SAFETY: the node stays alive and unaliased as long as &self.
        self.root.last().map(|e| unsafe { e.as_ref() }.value())
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.last().map(|e| {
            // SAFETY: the node stays alive and unaliased as long as &self.
            let e = unsafe { e.as_ref() };
            (e.key(), e.value())
        })
    }

    /// Insert `key`/`value`. A present key gets its value replaced and the
    /// old one handed back; the tree's shape and key set are untouched.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        let Some(mut current) = self.root.root else {
            self.root.root = Some(alloc::leak_node(Node::new(key, value)));
            self.len += 1;
            return None;
        };

        loop {
            // SAFETY: current is a live node of this tree; the borrow ends
            // before the next iteration moves on.
            let candidate = unsafe { current.as_mut() };
            match key.cmp(candidate.key()) {
                Equal => return Some(mem::replace(&mut candidate.value, value)),
                Less => {
                    if let Some(next) = candidate.left {
                        current = next;
                        continue;
                    }
                    self.attach(Node::new(key, value), current, ComingFrom::Left);
                    return None;
                }
                Greater => {
                    if let Some(next) = candidate.right {
                        current = next;
                        continue;
                    }
                    self.attach(Node::new(key, value), current, ComingFrom::Right);
                    return None;
                }
            }
        }
    }

    /// Remove `key`'s entry and return its value; None if absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let found = self.find(key)?;
        let detached = self.root.erase(found);
        // SAFETY: erase unlinked `detached` from every live node.
        let node = unsafe { alloc::own_back(detached) };
        self.len -= 1;
        Some(node.into_entry().1)
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.root.first()?;
        // The leftmost node has no left child, so erase detaches it in place.
        let detached = self.root.erase(first);
        // SAFETY: erase unlinked `detached` from every live node.
        let node = unsafe { alloc::own_back(detached) };
        self.len -= 1;
        Some(node.into_entry())
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.root.last()?;
        let detached = self.root.erase(last);
        // SAFETY: erase unlinked `detached` from every live node.
        let node = unsafe { alloc::own_back(detached) };
        self.len -= 1;
        Some(node.into_entry())
    }

    fn find<Q>(&self, key: &Q) -> NodePtr<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.root;
        while let Some(candidate) = node {
            // SAFETY: links of a live tree point at live nodes.
            let candidate = unsafe { candidate.as_ref() };
            match key.cmp(candidate.key().borrow()) {
                Equal => break,
                Less => node = candidate.left,
                Greater => node = candidate.right,
            }
        }
        node
    }

    fn attach(&mut self, node: Node<K, V>, parent: NonNull<Node<K, V>>, direction: ComingFrom) {
        let node = alloc::leak_node(node);
        // SAFETY: node is fresh and unlinked; parent is live with a free
        // slot on direction's side.
        unsafe { Node::link(node, parent, direction) };
        self.root.rebalance(Some(parent));
        self.len += 1;
    }

    /// Free every node bottom-up without recursion: dive to a leaf,
    /// detach it from its parent, resume from the parent.
    fn drop_nodes(&mut self) {
        let mut current = self.root.root;
        while let Some(node) = current {
            // SAFETY: links of a live tree point at live nodes; each node
            // is reclaimed exactly once, after both its subtrees.
            let node_ref = unsafe { node.as_ref() };
            if node_ref.left.is_some() {
                current = node_ref.left;
                continue;
            }
            if node_ref.right.is_some() {
                current = node_ref.right;
                continue;
            }
            let parent = node_ref.parent;
            if let Some(mut p) = parent {
                // SAFETY: the parent is live; the child borrow has ended.
                let p = unsafe { p.as_mut() };
                if p.left == current {
                    p.left = None;
                } else {
                    p.right = None;
                }
            }
            // SAFETY: node is now unlinked from every live node.
            drop(unsafe { alloc::own_back(node) });
            current = parent;
        }
    }
}

impl<K, V> Drop for Tree<K, V> {
    fn drop(&mut self) {
        self.drop_nodes();
    }
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Debug for Tree<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<K: Ord, V> Tree<K, V> {
    /// Audit every structural invariant: parent/child links mirror each
    /// other, keys are in strict search order, and each stored balance
    /// equals the actual height difference and stays within ±1.
    pub(crate) fn check_consistency(&self) {
        fn walk<K: Ord, V>(
            node: NodePtr<K, V>,
            parent: NodePtr<K, V>,
            min: Option<&K>,
            max: Option<&K>,
        ) -> usize {
            let Some(ptr) = node else { return 0 };
            let n = unsafe { ptr.as_ref() };
            assert_eq!(parent, n.parent);
            if let Some(min) = min {
                assert!(*min < *n.key());
            }
            if let Some(max) = max {
                assert!(*n.key() < *max);
            }
            let left = walk(n.left, node, min, Some(n.key()));
            let right = walk(n.right, node, Some(n.key()), max);
            let balance = right as isize - left as isize;
            assert_eq!(balance, n.balance as isize);
            assert!(balance.abs() <= 1);
            1 + left.max(right)
        }

        walk(self.root.root, None, None, None);
    }

    pub(crate) fn root_key(&self) -> Option<&K> {
        self.root.root.map(|n| unsafe { n.as_ref() }.key())
    }
}


#[cfg(all(test, not(miri)))]
mod props {
    use std::collections::BTreeMap;

    use quickcheck_macros::quickcheck;

    use crate::Tree;

    #[quickcheck]
    fn matches_btree_map(ops: Vec<(bool, u8)>) -> bool {
        let mut tree = Tree::new();
        let mut model = BTreeMap::new();
        for (insert, key) in ops {
            if insert {
                assert_eq!(model.insert(key, key), tree.insert(key, key));
            } else {
                assert_eq!(model.remove(&key), tree.remove(&key));
            }
            tree.check_consistency();
        }
        tree.len() == model.len() && tree.iter().map(|(k, _)| *k).eq(model.keys().copied())
    }

    #[quickcheck]
    fn in_order_is_strictly_sorted(keys: Vec<u16>) -> bool {
        let mut tree = Tree::new();
        for k in keys {
            tree.insert(k, ());
        }
        tree.check_consistency();
        tree.iter()
            .map(|(k, _)| *k)
            .collect::<Vec<u16>>()
            .windows(2)
            .all(|w| w[0] < w[1])
    }

    #[quickcheck]
    fn height_stays_logarithmic(keys: Vec<u16>) -> bool {
        let mut tree = Tree::new();
        for k in keys {
            tree.insert(k, ());
        }
        tree.height() as f64 <= 1.44 * (tree.len() as f64 + 2.0).log2()
    }

    #[quickcheck]
    fn insert_then_remove_roundtrip(keys: Vec<u8>, probe: u8) -> bool {
        let mut tree = Tree::new();
        for k in &keys {
            tree.insert(*k, ());
        }
        let before: Vec<u8> = tree.iter().map(|(k, _)| *k).collect();

        let had = tree.contains_key(&probe);
        tree.insert(probe, ());
        if !had {
            tree.remove(&probe);
        }
        tree.check_consistency();

        before == tree.iter().map(|(k, _)| *k).collect::<Vec<u8>>()
    }
}
