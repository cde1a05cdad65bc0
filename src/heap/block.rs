use std::fmt;

/// Identifier of a block within a heap. Ids are handed out in
/// creation order and never reused.
pub type BlockId = u64;

/// Bookkeeping cost charged against every block carved out of
/// a hole.
pub const CONTROL_BLOCK_OVERHEAD: usize = 0;

/// A single block of the heap chain, either a free hole or an
/// allocated region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryBlock {
    /// Usable size of the block, not counting the control block
    /// overhead.
    pub size: usize,
    /// Whether the block is a free hole.
    pub available: bool,
    /// Id of the previous block in the chain.
    pub prev: Option<BlockId>,
    /// Id of the next block in the chain.
    pub next: Option<BlockId>,
}

impl MemoryBlock {
    /// Free block with no neighbours yet, as created when the
    /// heap chain is first built.
    pub fn free(size: usize) -> Self {
        Self::new(true, size, None, None)
    }

    pub fn new(
        available: bool,
        size: usize,
        prev: Option<BlockId>,
        next: Option<BlockId>,
    ) -> Self {
        Self {
            size,
            available,
            prev,
            next,
        }
    }
}

impl fmt::Display for MemoryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.available { "free" } else { "alloc" };
        write!(f, "[{} {}]", state, self.size)
    }
}
