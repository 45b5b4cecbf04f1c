//! clip64 CLI: encode files under the given roots to base64 text; use --decode to reverse.

use anyhow::Result;
use clap::Parser;
use clip64::engine::arg_parser::Cli;
use clip64::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
