use std::{borrow::Borrow, ops::Index};

use crate::Tree;

mod node;
mod set;
mod tree;

pub use self::{
    set::SetIter,
    tree::{Balances, Iter},
};

impl<K, Q: ?Sized, V> Index<&Q> for Tree<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `Tree`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
