//! Delivery channels for finished batches.
//!
//! Delivery is best effort: a channel gets exactly one attempt per batch and
//! reports either an acknowledgement or a delivery error. Retry policy, if
//! any, belongs to the caller.

mod command;
mod report;
mod telegram;

pub use command::CommandNotifier;
pub use report::render_report;
pub use telegram::TelegramNotifier;

use std::sync::Arc;

use crate::core::batch::DeliveryRequest;
use crate::core::config::Config;
use crate::error::{NotifyError, PulsegramError, Result};

/// Receipt for a delivered batch.
#[derive(Debug, Default)]
pub struct Ack {
    /// Channel-specific receipt, e.g. the Telegram message id.
    pub receipt: Option<String>,
}

/// A place finished batches are handed to.
pub trait Notifier: Send + Sync {
    /// Channel name for logs.
    fn name(&self) -> &'static str;

    /// Attempt delivery once. Blocking; run off the async runtime.
    fn deliver(&self, request: &DeliveryRequest) -> std::result::Result<Ack, NotifyError>;
}

/// Pick the delivery channel from the configuration. Telegram wins if both
/// are configured.
pub fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>> {
    if let Some(telegram) = &config.telegram {
        return Ok(Arc::new(TelegramNotifier::new(
            telegram.token.clone(),
            telegram.chat_id.clone(),
        )?));
    }

    if let Some(argv) = &config.notify_command {
        return Ok(Arc::new(CommandNotifier::new(argv.clone())?));
    }

    Err(PulsegramError::config(
        "no delivery channel configured: set `telegram` or `notify_command`",
    ))
}
