use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One recorded sensor value. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricReading {
    pub metric: String,
    pub value: f64,
    /// Position within the cycle, starting at 1.
    pub index: u64,
}

/// Static host identity attached to every delivery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostMeta {
    pub hostname: String,
    pub distro: String,
    pub cores: usize,
    pub total_memory_bytes: u64,
}

/// Readings accumulated during one sampling cycle.
///
/// Series are keyed by metric name and grow in lock-step: a tick is recorded
/// all-or-nothing via [`record_tick`](SampleBatch::record_tick), so every
/// series always has the same length. Metrics that never report have no key at
/// all, never an empty series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleBatch {
    series: BTreeMap<String, Vec<MetricReading>>,
    ticks: u64,
    started_at: i64, // Unix timestamp
}

impl SampleBatch {
    pub fn new() -> Self {
        Self {
            series: BTreeMap::new(),
            ticks: 0,
            started_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Record one complete tick: exactly one reading per enabled metric.
    ///
    /// Returns the sample count after the tick. The caller stages the whole
    /// tick before committing, so a failed source never leaves a ragged batch
    /// behind.
    pub fn record_tick<I>(&mut self, readings: I) -> u64
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        self.ticks += 1;
        for (metric, value) in readings {
            self.series
                .entry(metric.to_string())
                .or_default()
                .push(MetricReading {
                    metric: metric.to_string(),
                    value,
                    index: self.ticks,
                });
        }
        self.ticks
    }

    /// Number of completed ticks (equals the length of every series).
    pub fn sample_count(&self) -> u64 {
        self.ticks
    }

    pub fn is_empty(&self) -> bool {
        self.ticks == 0
    }

    /// Metric names present in this batch, in deterministic order.
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.series.contains_key(metric)
    }

    pub fn series(&self, metric: &str) -> Option<&[MetricReading]> {
        self.series.get(metric).map(Vec::as_slice)
    }

    /// Average of a series, or None if the metric is absent or empty.
    pub fn mean(&self, metric: &str) -> Option<f64> {
        let readings = self.series.get(metric)?;
        if readings.is_empty() {
            return None;
        }
        let sum: f64 = readings.iter().map(|r| r.value).sum();
        Some(sum / readings.len() as f64)
    }

    /// Freeze the batch and attach delivery metadata.
    ///
    /// Consumes the batch: after finalization it belongs to the notifier and
    /// is never touched by the sampling loop again.
    pub fn finalize(self, meta: HostMeta, cycle: u64) -> DeliveryRequest {
        DeliveryRequest {
            batch: self,
            meta,
            cycle,
        }
    }
}

impl Default for SampleBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// A finalized batch on its way to a notifier.
///
/// Ownership transfers fully to the notifier; the orchestrator never reuses
/// or mutates a request after handing it off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub batch: SampleBatch,
    pub meta: HostMeta,
    pub cycle: u64,
}
