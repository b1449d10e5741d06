//! One-shot diagnostic: build every configured source, read each once, and
//! print what a sampling tick would record. Handy for picking a thermal zone.

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::sources::{build_sources, host_meta};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::resolve_config(matches)?;

    let mut sources = build_sources(&config).context("Failed to initialize metric sources")?;
    let meta = host_meta();

    println!(
        "{} {}",
        "Host:".white().bold(),
        format!("{} ({})", meta.hostname, meta.distro).cyan()
    );
    println!(
        "{} {}",
        "Cores:".white().bold(),
        meta.cores.to_string().yellow()
    );
    println!(
        "{} {}",
        "Thermal zone:".white().bold(),
        config.thermal_zone.to_string().yellow()
    );
    println!();

    for source in &mut sources {
        match source.read() {
            Ok(value) => {
                let rendered = match source.name() {
                    "temp" => format!("{value:.1}°C"),
                    _ => format!("{value:.1}%"),
                };
                println!(
                    "  {} {:<5} {}",
                    "✓".green(),
                    source.name(),
                    rendered.cyan().bold()
                );
            }
            Err(err) => {
                println!("  {} {:<5} {}", "✗".red(), source.name(), err.to_string().red());
            }
        }
    }

    Ok(())
}
