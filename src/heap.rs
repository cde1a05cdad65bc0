mod block;

pub use block::{BlockId, MemoryBlock, CONTROL_BLOCK_OVERHEAD};

use std::collections::{HashMap, HashSet};
use std::fmt;
use log::*;

use crate::config::HeapConfig;
use crate::error::HeapError;

/// Simulated heap: a fixed memory span divided into a chain of
/// free and allocated blocks. Requests are placed with a
/// worst-fit strategy, always splitting the largest hole.
///
/// Blocks are kept in a table indexed by id, and the chain is
/// formed by the `prev`/`next` ids stored in each block. Only
/// blocks reachable from the head are kept in the table.
pub struct Heap {
    blocks: HashMap<BlockId, MemoryBlock>,
    first: BlockId,
    id_counter: BlockId,
    config: HeapConfig,
}

/// Summary of the current state of a heap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub blocks: usize,
    pub free_blocks: usize,
    pub free_size: usize,
    pub allocated_size: usize,
    pub largest_free: Option<usize>,
}

impl Heap {
    /// Creates a heap with one free block per entry of
    /// `holes`, in order, using the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if `holes` is empty.
    pub fn new(holes: &[usize]) -> Self {
        Self::with_config(holes, HeapConfig::default())
    }

    /// Same as [`Heap::new`], with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if `holes` is empty.
    pub fn with_config(holes: &[usize], config: HeapConfig) -> Self {
        assert!(!holes.is_empty(), "a heap needs at least one hole");

        let mut blocks: HashMap<BlockId, MemoryBlock> = HashMap::with_capacity(holes.len());
        let mut prev: Option<BlockId> = None;

        // Ids follow the order of the holes, starting at 1, so
        // each block can be linked to the previous one as soon
        // as it is created.
        for (index, &size) in holes.iter().enumerate() {
            let id = index as BlockId + 1;
            let mut block = MemoryBlock::free(size);
            block.prev = prev;

            if let Some(prev_id) = prev {
                if let Some(prev_block) = blocks.get_mut(&prev_id) {
                    prev_block.next = Some(id);
                }
            }

            blocks.insert(id, block);
            prev = Some(id);
        }

        Self {
            blocks,
            first: 1,
            id_counter: holes.len() as BlockId + 1,
            config,
        }
    }

    /// Checked version of [`Heap::with_config`].
    pub fn try_new(holes: &[usize], config: HeapConfig) -> Result<Self, HeapError> {
        if holes.is_empty() {
            return Err(HeapError::NoHoles);
        }

        Ok(Self::with_config(holes, config))
    }

    /// Configuration the heap was built with.
    pub fn config(&self) -> HeapConfig {
        self.config
    }

    /// Tries to allocate `size` bytes from the largest free block
    /// of the heap. Returns `false`, leaving the heap untouched,
    /// if no free block is big enough.
    ///
    /// # Panics
    ///
    /// Panics if `size` plus the control block overhead
    /// overflows.
    pub fn request_allocation(&mut self, size: usize) -> bool {
        let overhead = self.config.control_block_overhead;
        let needed = size.checked_add(overhead).unwrap_or_else(|| {
            panic!("allocation size {} overflows with overhead {}", size, overhead)
        });

        // Worst fit: the candidate is the largest free block of
        // the heap. Having no free block at all and having only
        // blocks that are too small are the same failure.
        let candidate_id = match self.find_largest_free() {
            Some(id) => id,
            None => {
                debug!("Request of {} failed: no free block.", size);
                return false;
            }
        };
        // Copy the candidate out of the table: its links are
        // needed after the table has been modified.
        let candidate = self.blocks[&candidate_id];
        debug!("Attempting to allocate {} from {}.", needed, candidate);

        // Even the largest hole cannot hold the request and its
        // control block. Nothing has been touched yet.
        if candidate.size < needed {
            debug!("Request of {} failed: largest free block is {}.", size, candidate.size);
            return false;
        }

        // The overhead is charged a second time on the remaining
        // space, so a remainder that cannot pay for its own
        // control block is not created at all.
        let spare = candidate.size - needed;
        let allocated_id = self.next_id();
        let remainder_id = (spare > overhead).then(|| self.next_id());

        // The allocated block takes the place of the candidate,
        // followed by the remainder if there is one, and then by
        // whatever followed the candidate.
        self.blocks.insert(
            allocated_id,
            MemoryBlock::new(
                false,
                needed,
                candidate.prev,
                remainder_id.or(candidate.next),
            ),
        );

        // The remainder is a new hole sitting between the
        // allocated block and the candidate's old successor, so
        // it points back at the allocated block and forward at
        // that successor.
        if let Some(remainder_id) = remainder_id {
            self.blocks.insert(
                remainder_id,
                MemoryBlock::new(
                    true,
                    spare - overhead,
                    Some(allocated_id),
                    candidate.next,
                ),
            );
        }

        // Relink the neighbours. Without a predecessor the
        // candidate was the head, so the head moves to the
        // allocated block.
        match candidate.prev {
            Some(prev_id) => {
                if let Some(prev) = self.blocks.get_mut(&prev_id) {
                    prev.next = Some(allocated_id);
                }
            }
            None => self.first = allocated_id,
        }

        // If the candidate had a successor, its `prev` must now
        // point at the last of the new blocks: the remainder when
        // there is one, the allocated block otherwise. Without a
        // successor the candidate was the tail, and the new tail
        // already ends the chain with `next == None`.
        if let Some(next_id) = candidate.next {
            if let Some(next) = self.blocks.get_mut(&next_id) {
                next.prev = Some(remainder_id.unwrap_or(allocated_id));
            }
        }

        // The candidate is now unreachable from the chain, so it
        // is dropped from the table as well.
        self.blocks.remove(&candidate_id);

        debug!(
            "Split {} into {} allocated and {} free.",
            candidate.size,
            needed,
            remainder_id.map_or(0, |_| spare - overhead),
        );
        debug_assert_eq!(self.verify(), Ok(()));

        true
    }

    fn find_largest_free(&self) -> Option<BlockId> {
        let mut largest: Option<(BlockId, usize)> = None;

        // Strictly greater: among blocks of the same size, the
        // leftmost one wins.
        for (id, block) in self.iter() {
            if !block.available {
                continue;
            }

            match largest {
                Some((_, size)) if block.size <= size => {}
                _ => largest = Some((id, block.size)),
            }
        }

        largest.map(|(id, _)| id)
    }

    fn next_id(&mut self) -> BlockId {
        let id = self.id_counter;
        self.id_counter += 1;
        id
    }

    /// Human-readable traversal of the chain, from the first
    /// block to the last.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn first_block(&self) -> &MemoryBlock {
        &self.blocks[&self.first]
    }

    pub fn block(&self, id: BlockId) -> Option<&MemoryBlock> {
        self.blocks.get(&id)
    }

    /// Iterates over the chain as `(id, block)` pairs.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            heap: self,
            current: Some(self.first),
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &MemoryBlock> + '_ {
        self.iter().map(|(_, block)| block)
    }

    /// The `(size, available)` sequence of the chain.
    pub fn layout(&self) -> Vec<(usize, bool)> {
        self.blocks()
            .map(|block| (block.size, block.available))
            .collect()
    }

    pub fn stats(&self) -> HeapStats {
        self.blocks().fold(HeapStats::default(), |mut stats, block| {
            stats.blocks += 1;

            if block.available {
                stats.free_blocks += 1;
                stats.free_size += block.size;
                stats.largest_free = stats.largest_free.max(Some(block.size));
            } else {
                stats.allocated_size += block.size;
            }

            stats
        })
    }

    /// Checks the integrity of the chain: every link is mirrored
    /// by its neighbour, there is no cycle, walking backward from
    /// the tail gives the forward walk in reverse, and every
    /// block in the table is part of the chain.
    pub fn verify(&self) -> Result<(), HeapError> {
        let mut forward = Vec::with_capacity(self.blocks.len());
        let mut visited = HashSet::with_capacity(self.blocks.len());
        let mut prev: Option<BlockId> = None;
        let mut current = Some(self.first);

        while let Some(id) = current {
            if !visited.insert(id) {
                return Err(HeapError::Cycle(id));
            }

            let block = self.blocks.get(&id).ok_or(HeapError::BrokenLink(id))?;
            if block.prev != prev {
                return Err(HeapError::BrokenLink(id));
            }

            forward.push(id);
            prev = Some(id);
            current = block.next;
        }

        let mut backward = Vec::with_capacity(forward.len());
        let mut current = prev;

        while let Some(id) = current {
            if backward.len() == forward.len() {
                return Err(HeapError::Cycle(id));
            }

            backward.push(id);
            current = self.blocks.get(&id).ok_or(HeapError::BrokenLink(id))?.prev;
        }

        backward.reverse();
        if backward != forward {
            return Err(HeapError::BrokenLink(self.first));
        }

        // Detached blocks are removed from the table, so anything
        // left over is a block the chain lost track of.
        if let Some(&id) = self.blocks.keys().find(|id| !visited.contains(id)) {
            return Err(HeapError::BrokenLink(id));
        }

        Ok(())
    }
}

impl fmt::Display for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.blocks() {
            write!(f, " -> {}", block)?;
        }

        Ok(())
    }
}

/// Forward iterator over the blocks of a heap.
pub struct Iter<'a> {
    heap: &'a Heap,
    current: Option<BlockId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (BlockId, &'a MemoryBlock);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let block = self.heap.blocks.get(&id)?;
        self.current = block.next;
        Some((id, block))
    }
}
