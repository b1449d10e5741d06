use std::time::Duration;

use serde::Deserialize;

use crate::core::batch::DeliveryRequest;
use crate::error::{NotifyError, PulsegramError, Result};
use crate::notify::{render_report, Ack, Notifier};

/// Sends batch reports to a Telegram chat through the Bot API.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    token: String,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    result: Option<SentMessage>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self> {
        if token.is_empty() {
            return Err(PulsegramError::config("telegram token is empty"));
        }
        if chat_id.is_empty() {
            return Err(PulsegramError::config("telegram chat id is empty"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("pulsegram/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PulsegramError::runtime(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            chat_id,
        })
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn deliver(&self, request: &DeliveryRequest) -> std::result::Result<Ack, NotifyError> {
        let text = render_report(request);
        // The token is part of the URL; never log it.
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .map_err(|e| NotifyError::unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::rejected(
                status.as_u16(),
                response.text().unwrap_or_default(),
            ));
        }

        let body: SendMessageResponse = response
            .json()
            .map_err(|e| NotifyError::unreachable(format!("unreadable Bot API response: {e}")))?;

        if !body.ok {
            return Err(NotifyError::rejected(
                status.as_u16(),
                body.description.unwrap_or_default(),
            ));
        }

        Ok(Ack {
            receipt: body.result.map(|m| m.message_id.to_string()),
        })
    }
}
