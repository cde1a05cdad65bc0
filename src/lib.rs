//! Worst-fit heap simulator.
//!
//! A [`Heap`] models one contiguous memory span as a doubly
//! linked chain of blocks, each of them either a free hole or an
//! allocated region. Every request is served from the largest
//! hole, which is split into an allocated block and, when enough
//! space is left, a new hole.
//!
//! ```
//! use holeheap::Heap;
//!
//! let mut heap = Heap::new(&[1000, 4000, 300]);
//! assert!(heap.request_allocation(170));
//! assert_eq!(
//!     heap.render(),
//!     " -> [free 1000] -> [alloc 170] -> [free 3830] -> [free 300]"
//! );
//! ```

pub mod config;
pub mod error;
pub mod heap;

pub use config::{HeapConfig, Scenario};
pub use error::{ConfigError, HeapError};
pub use heap::{BlockId, Heap, HeapStats, MemoryBlock, CONTROL_BLOCK_OVERHEAD};
