use std::collections::HashMap;

use zerocopy::{LittleEndian, U16};

use crate::{NodeId, ParseErr, codec::DecodeErr, util::parse_hex_u16};

/// Read access to the flattened code trie.
///
/// Implemented by the owned [`CodeTable`] and by [`CodeTableRef`], the
/// zero-copy view over a table embedded in a container. The decoder is
/// generic over this trait so both sides share one descent loop.
pub trait CodeRead {
    /// Number of slots in the table.
    fn len(&self) -> usize;

    /// Raw value stored at `slot`.
    fn slot(&self, slot: usize) -> Option<u16>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The child reached from `node` along `bit`.
    ///
    /// A slot beyond the table means the trie and the data disagree; that is
    /// surfaced as an error rather than left to index arithmetic.
    fn child(&self, node: NodeId, bit: bool) -> Result<NodeId, DecodeErr> {
        let slot = node.child_slot(bit);
        self.slot(slot)
            .map(NodeId::new)
            .ok_or(DecodeErr::NodeRange { node, slot })
    }
}

/// An immutable code trie, flattened into an array of 16-bit values.
///
/// Construction also builds the child→parent index the encoder ascends
/// through. Rediscovering a parent by scanning the table costs a full pass
/// per path bit; resolving every slot to its owning node up front removes
/// that scan without changing what gets encoded.
#[derive(Debug, Clone)]
pub struct CodeTable {
    nodes: Box<[u16]>,
    parents: HashMap<u16, (NodeId, bool)>,
}

impl CodeTable {
    pub fn new(nodes: impl IntoIterator<Item = u16>) -> Self {
        let nodes: Box<[u16]> = nodes.into_iter().collect();
        let mut parents = HashMap::with_capacity(nodes.len());
        for (slot, &value) in nodes.iter().enumerate() {
            let (owner, bit) = NodeId::owner_of_slot(slot);
            // first occurrence wins; a well-formed table has no duplicates
            parents.entry(value).or_insert((owner, bit));
        }
        Self { nodes, parents }
    }

    /// Load a table from the driver's hex-string form, e.g. `["0x0101",
    /// "0x0102", "0x0041", ...]`.
    pub fn from_hex<I, S>(entries: I) -> Result<Self, ParseErr>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes = entries
            .into_iter()
            .map(|entry| parse_hex_u16(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(nodes))
    }

    /// The raw slots, in table order.
    pub fn nodes(&self) -> &[u16] {
        &self.nodes
    }

    /// The node whose child slot holds `value`, and which bit reaches it.
    ///
    /// `None` means `value` never appears in the table, so no root-to-leaf
    /// path exists for it.
    pub(crate) fn parent_of(&self, value: u16) -> Option<(NodeId, bool)> {
        self.parents.get(&value).copied()
    }
}

impl CodeRead for CodeTable {
    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn slot(&self, slot: usize) -> Option<u16> {
        self.nodes.get(slot).copied()
    }
}

impl FromIterator<u16> for CodeTable {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Zero-copy view of a code trie stored as little-endian 16-bit entries
/// inside a container buffer.
#[derive(Debug, Clone, Copy)]
pub struct CodeTableRef<'a> {
    nodes: &'a [U16<LittleEndian>],
}

impl<'a> CodeTableRef<'a> {
    pub(crate) fn new(nodes: &'a [U16<LittleEndian>]) -> Self {
        Self { nodes }
    }

    /// Copy the view into an owned [`CodeTable`], building the parent index
    /// along the way.
    pub fn to_table(self) -> CodeTable {
        CodeTable::new(self.nodes.iter().map(|value| value.get()))
    }
}

impl CodeRead for CodeTableRef<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn slot(&self, slot: usize) -> Option<u16> {
        self.nodes.get(slot).map(|value| value.get())
    }
}
