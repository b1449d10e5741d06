//! Drives sampling cycles end to end: arm the trigger, run a cycle, hand the
//! finished batch to the delivery channel, repeat until told to stop.

use std::sync::Arc;
use std::time::Duration;

use crate::core::batch::{DeliveryRequest, HostMeta, SampleBatch};
use crate::core::sampler::{run_cycle, CycleOutcome};
use crate::core::trigger::{DeliveryTrigger, TriggerKind};
use crate::error::{NotifyError, Result};
use crate::notify::{Ack, Notifier};
use crate::sources::MetricSource;

pub struct Orchestrator {
    sources: Vec<Box<dyn MetricSource>>,
    trigger: Arc<DeliveryTrigger>,
    notifier: Arc<dyn Notifier>,
    meta: HostMeta,
    period: Duration,
}

impl Orchestrator {
    pub fn new(
        sources: Vec<Box<dyn MetricSource>>,
        notifier: Arc<dyn Notifier>,
        meta: HostMeta,
        period: Duration,
    ) -> Self {
        Self {
            sources,
            trigger: Arc::new(DeliveryTrigger::new()),
            notifier,
            meta,
            period,
        }
    }

    /// Handle for wiring signal handlers (or tests) to the delivery trigger.
    pub fn trigger(&self) -> Arc<DeliveryTrigger> {
        Arc::clone(&self.trigger)
    }

    /// Run cycles until a shutdown trigger or a permanent source failure.
    ///
    /// Every trigger, including shutdown, flushes the current batch to the
    /// notifier. Delivery is best effort: a failed delivery is logged and the
    /// batch is gone. A shutdown that lands while a delivery is in flight
    /// ends the run right after that delivery. A transient source error
    /// discards the batch and starts a fresh cycle; a permanent one ends the
    /// run with the error.
    ///
    /// `on_tick` receives the cycle number and the running sample count.
    pub async fn run(mut self, mut on_tick: impl FnMut(u64, u64)) -> Result<()> {
        let mut cycle: u64 = 1;

        loop {
            self.trigger.rearm();
            let mut batch = SampleBatch::new();

            let outcome = run_cycle(
                &mut self.sources,
                &mut batch,
                &self.trigger,
                self.period,
                |count| on_tick(cycle, count),
            )
            .await;

            match outcome {
                CycleOutcome::Triggered(kind) => {
                    let samples = batch.sample_count();
                    let request = batch.finalize(self.meta.clone(), cycle);

                    match deliver(Arc::clone(&self.notifier), request).await {
                        Ok(ack) => match ack.receipt {
                            Some(receipt) => log::info!(
                                "cycle {cycle}: delivered {samples} samples via {} (receipt {receipt})",
                                self.notifier.name()
                            ),
                            None => log::info!(
                                "cycle {cycle}: delivered {samples} samples via {}",
                                self.notifier.name()
                            ),
                        },
                        Err(err) => log::error!(
                            "cycle {cycle}: delivery via {} failed, batch dropped: {err}",
                            self.notifier.name()
                        ),
                    }

                    if kind == TriggerKind::Shutdown {
                        log::info!("shutting down after {cycle} cycle(s)");
                        return Ok(());
                    }
                }
                CycleOutcome::Errored(err) if err.is_permanent() => {
                    log::error!("cycle {cycle}: {} source is gone: {err}", err.metric());
                    return Err(err.into());
                }
                CycleOutcome::Errored(err) => {
                    log::warn!(
                        "cycle {cycle}: dropping batch after transient {} failure: {err}",
                        err.metric()
                    );
                }
            }

            // A shutdown that fired after run_cycle returned, e.g. while the
            // batch was in the notifier's hands, is still pending here; the
            // next iteration's rearm would erase it.
            if self.trigger.peek() == Some(TriggerKind::Shutdown) {
                log::info!("shutting down after {cycle} cycle(s)");
                return Ok(());
            }

            cycle += 1;
        }
    }
}

/// Run a blocking notifier off the async runtime.
async fn deliver(
    notifier: Arc<dyn Notifier>,
    request: DeliveryRequest,
) -> std::result::Result<Ack, NotifyError> {
    match tokio::task::spawn_blocking(move || notifier.deliver(&request)).await {
        Ok(result) => result,
        Err(join) => Err(NotifyError::unreachable(format!(
            "delivery task died: {join}"
        ))),
    }
}

/// Translate process signals into trigger firings: SIGINT flushes the batch
/// and keeps sampling, SIGTERM flushes and shuts down.
#[cfg(unix)]
pub fn spawn_signal_listeners(trigger: &Arc<DeliveryTrigger>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let flush = Arc::clone(trigger);
    tokio::spawn(async move {
        while interrupt.recv().await.is_some() {
            log::info!("interrupt: flushing current batch");
            flush.fire(TriggerKind::Flush);
        }
    });

    let mut terminate = signal(SignalKind::terminate())?;
    let shutdown = Arc::clone(trigger);
    tokio::spawn(async move {
        // tokio's process-global handler stays installed either way, so a
        // one-shot task here would leave repeat terminations unheard.
        while terminate.recv().await.is_some() {
            log::info!("termination requested");
            shutdown.fire(TriggerKind::Shutdown);
        }
    });

    Ok(())
}

/// Without unix signals only Ctrl-C is available, so it maps to a flush;
/// stopping the process is left to the platform's service manager.
#[cfg(not(unix))]
pub fn spawn_signal_listeners(trigger: &Arc<DeliveryTrigger>) -> Result<()> {
    let flush = Arc::clone(trigger);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupt: flushing current batch");
            flush.fire(TriggerKind::Flush);
        }
    });

    Ok(())
}
