use std::ptr::NonNull;

use crate::Node;

/// Move a freshly built node onto the heap and leak it into the tree's
/// custody; pair every call with [`own_back`].
pub(crate) fn leak_node<K, V>(node: Node<K, V>) -> NonNull<Node<K, V>> {
    // SAFETY: Box::into_raw never returns null.
    unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(node))) }
}

/// Reclaim ownership of a node previously leaked by [`leak_node`].
///
/// # Safety
///
/// `node` must come from [`leak_node`], must not have been reclaimed
/// before, and must no longer be linked from any live node.
pub(crate) unsafe fn own_back<K, V>(node: NonNull<Node<K, V>>) -> Box<Node<K, V>> {
    unsafe { Box::from_raw(node.as_ptr()) }
}
