use crate::resource::MaterialHandle;
use crate::scene::NodeId;
use std::collections::HashMap;

/// Original materials of the nodes darkened for the current frame.
///
/// Filled by the darken pass and drained by the restore pass of the same
/// frame. Only the compositor mutates it.
#[derive(Clone, Debug, Default)]
pub struct SubstitutionTable {
    originals: HashMap<NodeId, MaterialHandle>,
}

impl SubstitutionTable {
    /// An empty table.
    pub fn new() -> SubstitutionTable {
        SubstitutionTable::default()
    }

    /// Records the original material of `node`.
    ///
    /// An existing entry is kept: a node darkened twice must still get its
    /// first material back.
    pub(crate) fn save(&mut self, node: NodeId, original: MaterialHandle) {
        let _ = self.originals.entry(node).or_insert(original);
    }

    /// Removes and returns the original material of `node`, if recorded.
    pub(crate) fn take(&mut self, node: NodeId) -> Option<MaterialHandle> {
        self.originals.remove(&node)
    }

    /// Forgets every entry, returning how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let n = self.originals.len();
        self.originals.clear();
        n
    }

    /// The recorded original material of `node`.
    pub fn get(&self, node: NodeId) -> Option<MaterialHandle> {
        self.originals.get(&node).copied()
    }

    /// Whether `node` is currently darkened.
    pub fn contains(&self, node: NodeId) -> bool {
        self.originals.contains_key(&node)
    }

    /// Number of darkened nodes.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Whether no node is darkened.
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Iterates over `(node, original material)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, MaterialHandle)> + '_ {
        self.originals.iter().map(|(k, v)| (*k, *v))
    }
}
