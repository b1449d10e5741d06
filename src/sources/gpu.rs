#[cfg(feature = "nvml")]
use nvml_wrapper::Nvml;

use crate::error::SourceError;
use crate::sources::MetricSource;

/// GPU memory pressure via NVML: used VRAM over total VRAM, as a percentage,
/// for device 0.
///
/// Only built when the `nvml` feature is enabled. Without it, construction
/// fails and the sampling loop simply runs without a gpu series.
pub struct GpuMemorySource {
    #[cfg(feature = "nvml")]
    nvml: Nvml,
}

#[cfg(feature = "nvml")]
impl GpuMemorySource {
    pub fn new() -> Result<Self, SourceError> {
        let nvml = Nvml::init().map_err(map_nvml_error)?;
        // Probe device 0 now so a driver without a usable GPU is caught at
        // startup instead of failing every tick.
        nvml.device_by_index(0).map_err(map_nvml_error)?;
        Ok(Self { nvml })
    }
}

#[cfg(not(feature = "nvml"))]
impl GpuMemorySource {
    pub fn new() -> Result<Self, SourceError> {
        Err(SourceError::unavailable("gpu", "built without NVML support"))
    }
}

impl MetricSource for GpuMemorySource {
    fn name(&self) -> &'static str {
        "gpu"
    }

    #[cfg(feature = "nvml")]
    fn read(&mut self) -> Result<f64, SourceError> {
        let device = self.nvml.device_by_index(0).map_err(map_nvml_error)?;
        let memory = device.memory_info().map_err(map_nvml_error)?;

        if memory.total == 0 {
            return Err(SourceError::read("gpu", "total VRAM reported as zero"));
        }

        Ok(memory.used as f64 / memory.total as f64 * 100.0)
    }

    #[cfg(not(feature = "nvml"))]
    fn read(&mut self) -> Result<f64, SourceError> {
        Err(SourceError::unavailable("gpu", "built without NVML support"))
    }
}

#[cfg(feature = "nvml")]
fn map_nvml_error(err: nvml_wrapper::error::NvmlError) -> SourceError {
    use nvml_wrapper::error::NvmlError;

    match err {
        NvmlError::NoPermission => SourceError::permission_denied("gpu"),
        e @ (NvmlError::Uninitialized | NvmlError::DriverNotLoaded | NvmlError::NotFound) => {
            SourceError::unavailable("gpu", e.to_string())
        }
        e => SourceError::read("gpu", e.to_string()),
    }
}
