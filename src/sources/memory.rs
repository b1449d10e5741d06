use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use crate::error::SourceError;
use crate::sources::MetricSource;

/// RAM usage as the percentage of physical memory not currently free.
///
/// Free memory, not available memory: page cache counts as used, which is
/// what the kernel's MemFree figure reflects.
pub struct MemorySource {
    sys: System,
}

impl MemorySource {
    pub fn new() -> Result<Self, SourceError> {
        let refresh = RefreshKind::nothing().with_memory(MemoryRefreshKind::everything());
        let sys = System::new_with_specifics(refresh);

        if sys.total_memory() == 0 {
            return Err(SourceError::unavailable("ram", "total memory reported as zero"));
        }

        Ok(Self { sys })
    }
}

impl MetricSource for MemorySource {
    fn name(&self) -> &'static str {
        "ram"
    }

    fn read(&mut self) -> Result<f64, SourceError> {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SourceError::read("ram", "total memory reported as zero"));
        }

        let free = self.sys.free_memory();
        Ok((1.0 - free as f64 / total as f64) * 100.0)
    }
}
