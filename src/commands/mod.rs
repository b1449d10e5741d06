// Command handlers module
pub mod probe;
pub mod run;

// Re-exports for cleaner imports
pub use probe::execute as probe;
pub use run::execute as run;

use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;

use crate::core::config::Config;

/// Load the config file and fold the shared CLI flags over it.
pub(crate) fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config =
        Config::load(path.map(PathBuf::as_path)).context("Failed to load configuration")?;

    if let Some(period) = matches.get_one::<u64>("period") {
        config.period_secs = *period;
    }
    if matches.get_flag("no-gpu") {
        config.gpu = false;
    }
    if let Some(zone) = matches.get_one::<u32>("thermal-zone") {
        config.thermal_zone = *zone;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
