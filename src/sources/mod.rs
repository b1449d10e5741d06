//! Metric sources: one scalar reading per call for a named hardware metric.
//!
//! Sources are queried in a fixed order each tick (cpu, ram, temp, gpu) so
//! batches are deterministic regardless of configuration.

mod cpu;
mod gpu;
mod memory;
mod thermal;

pub use cpu::CpuLoadSource;
pub use gpu::GpuMemorySource;
pub use memory::MemorySource;
pub use thermal::ThermalSource;

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::core::batch::HostMeta;
use crate::core::config::Config;
use crate::error::{Result, SourceError};

/// Capability that yields one scalar reading per call for a named metric.
///
/// Implementations own whatever OS handles they need and are queried from the
/// sampling loop only, one at a time.
pub trait MetricSource: Send {
    /// Metric name used as the series key in a batch.
    fn name(&self) -> &'static str;

    /// Take one reading.
    fn read(&mut self) -> std::result::Result<f64, SourceError>;
}

/// Build the enabled sources in the fixed sampling order.
///
/// cpu, ram, and the configured thermal zone are mandatory and fail
/// construction eagerly. The GPU source degrades to absent: if GPU monitoring
/// is enabled but NVML cannot be initialized, sampling continues without a
/// gpu series.
pub fn build_sources(config: &Config) -> Result<Vec<Box<dyn MetricSource>>> {
    let mut sources: Vec<Box<dyn MetricSource>> = vec![
        Box::new(CpuLoadSource::new()?),
        Box::new(MemorySource::new()?),
        Box::new(ThermalSource::new(config.thermal_zone)?),
    ];

    if config.gpu {
        match GpuMemorySource::new() {
            Ok(gpu) => sources.push(Box::new(gpu)),
            Err(err) => {
                log::warn!("GPU monitoring enabled but not usable, continuing without it: {err}")
            }
        }
    }

    Ok(sources)
}

/// Collect the static host identity attached to every delivery.
pub fn host_meta() -> HostMeta {
    let refresh = RefreshKind::nothing()
        .with_cpu(CpuRefreshKind::everything())
        .with_memory(MemoryRefreshKind::everything());
    let sys = System::new_with_specifics(refresh);

    let distro = match (System::name(), System::os_version()) {
        (Some(name), Some(version)) => format!("{} {}", name, version),
        (Some(name), None) => name,
        _ => "Unknown".to_string(),
    };

    HostMeta {
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        distro,
        cores: sys.cpus().len(),
        total_memory_bytes: sys.total_memory(),
    }
}
