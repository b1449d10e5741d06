use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;

use pulsegram::commands;

fn main() -> Result<()> {
    pulsegram::init_logging();

    let matches = Command::new("pulsegram")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Samples host hardware metrics and ships batched reports to a chat channel")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(with_sampling_args(
            Command::new("run").about("Sample in a loop and deliver a batch on every signal"),
        ))
        .subcommand(with_sampling_args(
            Command::new("probe")
                .about("Read every configured source once and print what a tick would record"),
        ))
        .get_matches();

    if matches.get_flag("version") {
        println!("pulsegram version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            commands::run(sub_matches)?;
        }
        Some(("probe", sub_matches)) => {
            commands::probe(sub_matches)?;
        }
        _ => {
            println!("Welcome to pulsegram!");
            println!("Use 'pulsegram --help' for more information.");
        }
    }

    Ok(())
}

/// Flags shared by every subcommand that builds sources from the config.
fn with_sampling_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Path to the config file (default: the user config directory)"),
    )
    .arg(
        Arg::new("period")
            .short('p')
            .long("period")
            .value_name("SECS")
            .value_parser(clap::value_parser!(u64))
            .help("Seconds between samples"),
    )
    .arg(
        Arg::new("thermal-zone")
            .long("thermal-zone")
            .value_name("N")
            .value_parser(clap::value_parser!(u32))
            .help("Thermal zone number under /sys/class/thermal"),
    )
    .arg(
        Arg::new("no-gpu")
            .long("no-gpu")
            .help("Skip GPU sampling even if configured on")
            .action(clap::ArgAction::SetTrue),
    )
}
