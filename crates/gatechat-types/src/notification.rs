//! Out-of-band notifications delivered to the conversation.
//!
//! A notification relay hands over `{id?, title, body, sentAtMs?}` payloads
//! through one of three delivery mechanisms. The conversation only cares
//! about the payload and its delivery key; the transport is a label.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Delivery mechanism a notification arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryTransport {
    /// Best-effort live delivery; may be dropped.
    Live,
    /// Queued, guaranteed delivery; may arrive late.
    Queued,
    /// Only the most recent value survives.
    LatestValue,
}

impl fmt::Display for DeliveryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryTransport::Live => write!(f, "live"),
            DeliveryTransport::Queued => write!(f, "queued"),
            DeliveryTransport::LatestValue => write!(f, "latest"),
        }
    }
}

impl FromStr for DeliveryTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(DeliveryTransport::Live),
            "queued" => Ok(DeliveryTransport::Queued),
            "latest" | "latest_value" => Ok(DeliveryTransport::LatestValue),
            other => Err(format!("invalid delivery transport: '{other}'")),
        }
    }
}

/// Payload delivered by the notification relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub sent_at_ms: Option<i64>,
}

impl Notification {
    pub fn new(
        id: Option<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        sent_at_ms: Option<i64>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            sent_at_ms,
        }
    }

    /// Key used to drop duplicate deliveries.
    ///
    /// A non-empty explicit id wins. Otherwise the key is title, body and
    /// send time (0 when absent) concatenated, so two id-less notifications
    /// with identical content and time collide.
    pub fn delivery_key(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!(
                "{}{}{}",
                self.title,
                self.body,
                self.sent_at_ms.unwrap_or(0)
            ),
        }
    }

    /// Text shown in the conversation for this notification.
    pub fn display_text(&self) -> String {
        match (self.title.trim().is_empty(), self.body.trim().is_empty()) {
            (false, false) => format!("{}\n{}", self.title, self.body),
            (false, true) => self.title.clone(),
            _ => self.body.clone(),
        }
    }
}
