//! The sampling cycle: a timer-driven loop that reads every source once per
//! period and parks itself between ticks.
//!
//! A cycle runs until the delivery trigger fires or a source fails. The
//! trigger arm of the select loop is polled first, so a trigger raised while
//! the loop is parked wakes it immediately instead of waiting out the period.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::core::batch::SampleBatch;
use crate::core::trigger::{DeliveryTrigger, TriggerKind};
use crate::error::SourceError;
use crate::sources::MetricSource;

/// Why a cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The delivery trigger fired; the batch holds every completed tick.
    Triggered(TriggerKind),
    /// A source failed; the batch is not worth delivering.
    Errored(SourceError),
}

/// Run one sampling cycle, appending completed ticks to `batch`.
///
/// Each tick reads every source in order and records the readings only if
/// all of them succeed, so series stay in lock step. `on_tick` is called
/// with the running sample count after every recorded tick.
///
/// The first tick lands one full period after the call, not immediately.
/// Ticks missed while the executor is stalled are skipped, not bunched.
pub async fn run_cycle(
    sources: &mut [Box<dyn MetricSource>],
    batch: &mut SampleBatch,
    trigger: &DeliveryTrigger,
    period: Duration,
    mut on_tick: impl FnMut(u64),
) -> CycleOutcome {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            kind = trigger.fired() => return CycleOutcome::Triggered(kind),

            _ = ticker.tick() => {
                match sample_tick(sources, trigger) {
                    // Trigger fired mid-tick: the staged readings are dropped
                    // and the next loop iteration observes the trigger.
                    Ok(None) => {}
                    Ok(Some(readings)) => {
                        let count = batch.record_tick(readings);
                        on_tick(count);
                    }
                    Err(err) => return CycleOutcome::Errored(err),
                }
            }
        }
    }
}

/// Read every source once. Returns `Ok(None)` if the trigger fired while the
/// tick was in progress; any read error aborts the whole tick.
fn sample_tick(
    sources: &mut [Box<dyn MetricSource>],
    trigger: &DeliveryTrigger,
) -> Result<Option<Vec<(&'static str, f64)>>, SourceError> {
    let mut staged = Vec::with_capacity(sources.len());

    for source in sources.iter_mut() {
        if trigger.is_fired() {
            return Ok(None);
        }
        staged.push((source.name(), source.read()?));
    }

    Ok(Some(staged))
}
