// Pulsegram Library - Public API

// Re-export error types
pub mod error;
pub use error::{PulsegramError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod notify;
pub mod sources;

// Re-export commonly used types
pub use crate::core::config::Config;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
