use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod demo;
mod info;
mod new;

mod config;

pub use config::Config;

/// vesna-cdf - CDF experiment descriptions for VESNA spectrum sensing
#[derive(Parser)]
#[command(name = "vesna-cdf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an experiment from a TOML description
    New {
        /// Experiment configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Directory receiving {tag}.cdf and {tag}.dat/
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Display a summary of a .cdf experiment description
    Info {
        /// Input .cdf file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Record a synthetic experiment for testing
    Demo {
        /// Output directory
        #[arg(value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Number of iterations to record
        #[arg(short = 'n', long, default_value = "3")]
        iterations: usize,
    },
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::New { config, output } => new::run(config, output),
        Commands::Info { file } => info::run(file),
        Commands::Demo { output, iterations } => demo::run(output, iterations),
    }
}
