use std::fs;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::sources::MetricSource;

/// Temperature of one sysfs thermal zone, in degrees Celsius.
///
/// The kernel exposes the value in millidegrees under
/// `/sys/class/thermal/thermal_zone<N>/temp`.
#[derive(Debug)]
pub struct ThermalSource {
    path: PathBuf,
}

impl ThermalSource {
    /// A missing zone is a configuration problem, so the path is checked
    /// here rather than on first read.
    pub fn new(zone: u32) -> Result<Self, SourceError> {
        let path = PathBuf::from(format!("/sys/class/thermal/thermal_zone{zone}/temp"));

        if !path.exists() {
            return Err(SourceError::unavailable(
                "temp",
                format!("thermal zone {zone} not present ({})", path.display()),
            ));
        }

        Ok(Self { path })
    }
}

impl MetricSource for ThermalSource {
    fn name(&self) -> &'static str {
        "temp"
    }

    fn read(&mut self) -> Result<f64, SourceError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| SourceError::from_io("temp", e))?;

        let millidegrees: f64 = raw
            .trim()
            .parse()
            .map_err(|_| SourceError::parse("temp", format!("not a number: {:?}", raw.trim())))?;

        Ok(millidegrees / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn zone_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn converts_millidegrees() {
        let file = zone_file("45500\n");
        let mut source = ThermalSource {
            path: file.path().to_path_buf(),
        };
        assert_eq!(source.read().unwrap(), 45.5);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let file = zone_file("not-a-temp\n");
        let mut source = ThermalSource {
            path: file.path().to_path_buf(),
        };
        let err = source.read().unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert!(!err.is_permanent());
    }

    #[test]
    fn vanished_zone_is_unavailable() {
        let file = zone_file("45500\n");
        let path = file.path().to_path_buf();
        drop(file);
        let mut source = ThermalSource { path };
        let err = source.read().unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[test]
    fn missing_zone_rejected_at_construction() {
        let err = ThermalSource::new(9999).unwrap_err();
        assert!(err.is_permanent());
    }
}
