use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use super::Config;

/// Create an experiment description from a TOML file
pub fn run(config: PathBuf, output: PathBuf) -> Result<()> {
    let config = Config::from_file(&config)?;
    let mut experiment = config.to_experiment()?;

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    experiment
        .flush_default(&output)
        .context("Failed to write experiment description")?;

    let path = output.join(format!("{}.cdf", experiment.tag()));
    info!("Created experiment {}", experiment.tag());
    println!("{}", path.display());

    Ok(())
}
