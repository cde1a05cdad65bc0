use clap::Parser;

use crate::error::ConfigError;
use crate::heap::CONTROL_BLOCK_OVERHEAD;

/// Settings of a heap that are fixed for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Bookkeeping cost charged per block when checking whether
    /// a hole can satisfy a request.
    pub control_block_overhead: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            control_block_overhead: CONTROL_BLOCK_OVERHEAD,
        }
    }
}

/// One run of the driver: the holes the heap starts with and
/// the requests issued against it, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub holes: Vec<usize>,
    pub requests: Vec<usize>,
    pub config: HeapConfig,
}

pub const DEFAULT_HOLES: [usize; 5] = [1000, 4000, 300, 500, 800];
pub const DEFAULT_REQUESTS: [usize; 5] = [170, 480, 210, 4180, 690];

impl Default for Scenario {
    fn default() -> Self {
        Self {
            holes: DEFAULT_HOLES.to_vec(),
            requests: DEFAULT_REQUESTS.to_vec(),
            config: HeapConfig::default(),
        }
    }
}

/// Command line of the driver.
#[derive(Parser, Debug)]
#[command(name = "holeheap")]
#[command(about = "Worst-fit heap simulator", long_about = None)]
pub struct Cli {
    /// Sizes of the initial holes, in order
    #[arg(long, value_delimiter = ',', num_args = 0.., default_values_t = DEFAULT_HOLES.to_vec())]
    pub holes: Vec<usize>,

    /// Sizes of the allocation requests, in order
    #[arg(long, value_delimiter = ',', num_args = 0.., default_values_t = DEFAULT_REQUESTS.to_vec())]
    pub requests: Vec<usize>,

    /// Control block overhead charged per block
    #[arg(long, default_value_t = CONTROL_BLOCK_OVERHEAD)]
    pub overhead: usize,
}

impl TryFrom<Cli> for Scenario {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, ConfigError> {
        // `--holes` given without any value leaves the list
        // empty, and a heap cannot be built from that.
        if cli.holes.is_empty() {
            return Err(ConfigError::NoHoles);
        }

        Ok(Self {
            holes: cli.holes,
            requests: cli.requests,
            config: HeapConfig {
                control_block_overhead: cli.overhead,
            },
        })
    }
}

impl Scenario {
    /// Builds a scenario from command-line arguments (without
    /// the program name). Anything not given keeps its default.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let args = std::iter::once("holeheap".to_string()).chain(args);
        let cli = Cli::try_parse_from(args)?;

        Self::try_from(cli)
    }
}
