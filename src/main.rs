use anyhow::{Context, Result};
use clap::Parser;
use log::*;

use holeheap::{config::Cli, Heap, Scenario};

fn main() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    // Help, version and malformed arguments are handled by clap,
    // which prints the message and exits.
    let scenario = Scenario::try_from(Cli::parse())
        .context("Failed to read the scenario from the command line.")?;

    let mut heap = Heap::try_new(&scenario.holes, scenario.config)?;
    info!(
        "Initial heap (overhead {}):{}",
        heap.config().control_block_overhead,
        heap
    );

    // Requests are issued in order; a failed one leaves the heap
    // as it was, so the next request sees the same chain.
    for &request in &scenario.requests {
        info!("Requesting {} bytes of memory", request);

        if heap.request_allocation(request) {
            info!("-- Successful");
        } else {
            warn!("-- Unsuccessful");
        }
    }

    info!("Final heap:{}", heap);
    debug!("{:?}", heap.stats());

    Ok(())
}
