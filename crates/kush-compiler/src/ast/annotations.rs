//! Side table keyed by node identity.

use super::NodeId;
use rustc_hash::FxHashMap;

/// Associates values with AST nodes without storing anything in the tree.
///
/// Keys are node ids, so entries only make sense together with the tree they
/// were computed for; clear the table when the tree is dropped.
#[derive(Debug, Clone)]
pub struct AstAnnotations<V> {
    entries: FxHashMap<NodeId, V>,
}

impl<V> Default for AstAnnotations<V> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<V> AstAnnotations<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `value` with `node`, returning the value it replaces.
    pub fn insert(&mut self, node: NodeId, value: V) -> Option<V> {
        self.entries.insert(node, value)
    }

    pub fn get(&self, node: NodeId) -> Option<&V> {
        self.entries.get(&node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut V> {
        self.entries.get_mut(&node)
    }

    pub fn remove(&mut self, node: NodeId) -> Option<V> {
        self.entries.remove(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &V)> {
        self.entries.iter().map(|(node, value)| (*node, value))
    }
}
