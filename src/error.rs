use std::io;
use thiserror::Error;

/// Error raised by a metric source while reading a sensor.
///
/// Classification matters more than the message: `Unavailable` and
/// `PermissionDenied` are permanent (the orchestrator terminates the process),
/// `Parse` and `Read` are transient (the current cycle is aborted and a fresh
/// one starts).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{metric}: sensor unavailable: {reason}")]
    Unavailable { metric: &'static str, reason: String },

    #[error("{metric}: permission denied reading sensor")]
    PermissionDenied { metric: &'static str },

    #[error("{metric}: malformed reading: {reason}")]
    Parse { metric: &'static str, reason: String },

    #[error("{metric}: read failed: {reason}")]
    Read { metric: &'static str, reason: String },
}

impl SourceError {
    pub fn unavailable<S: Into<String>>(metric: &'static str, reason: S) -> Self {
        SourceError::Unavailable {
            metric,
            reason: reason.into(),
        }
    }

    pub fn permission_denied(metric: &'static str) -> Self {
        SourceError::PermissionDenied { metric }
    }

    pub fn parse<S: Into<String>>(metric: &'static str, reason: S) -> Self {
        SourceError::Parse {
            metric,
            reason: reason.into(),
        }
    }

    pub fn read<S: Into<String>>(metric: &'static str, reason: S) -> Self {
        SourceError::Read {
            metric,
            reason: reason.into(),
        }
    }

    /// Map an I/O error from a sensor file to the right variant.
    ///
    /// A vanished file and a permission failure are permanent; anything else is
    /// treated as a transient read glitch.
    pub fn from_io(metric: &'static str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SourceError::unavailable(metric, err.to_string()),
            io::ErrorKind::PermissionDenied => SourceError::permission_denied(metric),
            _ => SourceError::read(metric, err.to_string()),
        }
    }

    /// Whether this failure should terminate the process rather than retry
    /// with a fresh cycle.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SourceError::Unavailable { .. } | SourceError::PermissionDenied { .. }
        )
    }

    /// Name of the metric whose source failed.
    pub fn metric(&self) -> &'static str {
        match self {
            SourceError::Unavailable { metric, .. }
            | SourceError::PermissionDenied { metric }
            | SourceError::Parse { metric, .. }
            | SourceError::Read { metric, .. } => metric,
        }
    }
}

/// Error raised by a notifier while delivering a batch.
///
/// Delivery failures are reported and the batch dropped; they never stop the
/// sampling loop.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notifier unreachable: {0}")]
    Unreachable(String),

    #[error("delivery rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
}

impl NotifyError {
    pub fn unreachable<S: Into<String>>(reason: S) -> Self {
        NotifyError::Unreachable(reason.into())
    }

    pub fn rejected<S: Into<String>>(status: u16, detail: S) -> Self {
        NotifyError::Rejected {
            status,
            detail: detail.into(),
        }
    }
}

/// Custom error type for the pulsegram application
#[derive(Error, Debug)]
pub enum PulsegramError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metric source error: {0}")]
    Source(#[from] SourceError),

    #[error("Delivery error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for the pulsegram application
pub type Result<T> = std::result::Result<T, PulsegramError>;

impl PulsegramError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PulsegramError::Config(msg.into())
    }

    /// Create a runtime error
    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        PulsegramError::Runtime(msg.into())
    }
}
