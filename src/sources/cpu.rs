use sysinfo::{CpuRefreshKind, RefreshKind, System};

use crate::error::SourceError;
use crate::sources::MetricSource;

/// CPU pressure as the 1-minute load average normalized by core count,
/// expressed as a percentage. 100 means one runnable task per core.
pub struct CpuLoadSource {
    cores: usize,
}

impl CpuLoadSource {
    pub fn new() -> Result<Self, SourceError> {
        let refresh = RefreshKind::nothing().with_cpu(CpuRefreshKind::everything());
        let sys = System::new_with_specifics(refresh);
        let cores = sys.cpus().len();

        if cores == 0 {
            return Err(SourceError::unavailable("cpu", "no CPU cores reported"));
        }

        Ok(Self { cores })
    }

    pub fn cores(&self) -> usize {
        self.cores
    }
}

impl MetricSource for CpuLoadSource {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn read(&mut self) -> Result<f64, SourceError> {
        let load = System::load_average().one;
        if !load.is_finite() || load < 0.0 {
            return Err(SourceError::read(
                "cpu",
                format!("invalid load average: {load}"),
            ));
        }

        Ok(load / self.cores as f64 * 100.0)
    }
}
