//! # vesna-cdf
//!
//! A command-line tool for creating and inspecting CDF experiment
//! descriptions.
//!
//! ## Usage
//!
//! ```bash
//! # Create {tag}.cdf and {tag}.dat/ from a TOML description
//! vesna-cdf new experiment.toml -o out/
//!
//! # Show what a description contains
//! vesna-cdf info out/t1.cdf
//!
//! # Record a synthetic experiment
//! vesna-cdf demo out/ -n 5
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbose);
    cli::dispatch(cli)
}
