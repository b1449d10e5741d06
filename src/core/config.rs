use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PulsegramError, Result};

fn default_period_secs() -> u64 {
    30
}

fn default_gpu() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between samples within a cycle.
    #[serde(default = "default_period_secs")]
    pub period_secs: u64,
    /// Whether to sample GPU memory at all.
    #[serde(default = "default_gpu")]
    pub gpu: bool,
    /// Which /sys/class/thermal zone to read.
    #[serde(default)]
    pub thermal_zone: u32,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    /// Fallback channel: argv of a program fed the batch as JSON on stdin.
    #[serde(default)]
    pub notify_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    // Older deployments spelled the key in camel case.
    #[serde(alias = "chatID")]
    pub chat_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            period_secs: default_period_secs(),
            gpu: default_gpu(),
            thermal_zone: 0,
            telegram: None,
            notify_command: None,
        }
    }
}

impl Config {
    /// Load the configuration file.
    ///
    /// With an explicit path the file must exist and parse; the daemon should
    /// not run on defaults the operator never asked for. Without one, a
    /// missing file at the conventional location just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !path.exists() {
            if required {
                return Err(PulsegramError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&data).map_err(|e| {
            PulsegramError::config(format!("invalid config {}: {e}", path.display()))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| PulsegramError::config("could not determine config directory"))?;
        Ok(dir.join("pulsegram").join("config.json"))
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.period_secs == 0 {
            return Err(PulsegramError::config("period_secs must be at least 1"));
        }
        Ok(())
    }
}
