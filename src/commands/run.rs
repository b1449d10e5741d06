//! Daemon command handler.
//!
//! Runs the sampling loop in the foreground until SIGTERM (or a dead source)
//! stops it. SIGINT flushes the batch collected so far and keeps going.

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::io::Write;

use crate::core::orchestrator::{spawn_signal_listeners, Orchestrator};
use crate::notify::build_notifier;
use crate::sources::{build_sources, host_meta};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::resolve_config(matches)?;

    let sources = build_sources(&config).context("Failed to initialize metric sources")?;
    let notifier = build_notifier(&config).context("Failed to configure delivery channel")?;
    let meta = host_meta();

    let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
    log::info!(
        "sampling {} every {}s on {}, delivering via {}",
        names.join(", "),
        config.period_secs,
        meta.hostname,
        notifier.name()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("pulsegram-worker")
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(async {
        let orchestrator = Orchestrator::new(sources, notifier, meta, config.period());
        spawn_signal_listeners(&orchestrator.trigger())?;

        orchestrator
            .run(|cycle, count| {
                print!(
                    "\r{} cycle {}, {} sample(s) ",
                    "Sampling:".white(),
                    cycle.to_string().cyan().bold(),
                    count.to_string().yellow().bold()
                );
                std::io::stdout().flush().ok();
            })
            .await
    })?;

    println!();
    println!("{}", "Shutdown complete, last batch flushed.".green());

    Ok(())
}
