use thiserror::Error;

use crate::heap::BlockId;

/// Errors reported by the heap itself. Running out of space is
/// not one of them: a request that does not fit simply returns
/// `false`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HeapError {
    #[error("A heap needs at least one hole.")]
    NoHoles,
    #[error("Broken link at block {0:?}.")]
    BrokenLink(BlockId),
    #[error("Cycle detected at block {0:?}.")]
    Cycle(BlockId),
}

/// Errors found while reading a scenario from the command line.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("The hole list is empty.")]
    NoHoles,
}
