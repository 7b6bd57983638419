//! Push payloads and notifications
//!
//! Payloads are operator-sent JSON with every field optional. Malformed
//! data never drops the event; each missing piece falls back to its
//! default independently.

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Koun";
pub const DEFAULT_BODY: &str = "There is news from your store.";
pub const DEFAULT_URL: &str = "/";

/// Wire payload of a push message
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

impl PushPayload {
    /// Parse optional payload bytes; anything unusable becomes the empty
    /// payload
    pub fn parse(data: Option<&[u8]>) -> Self {
        let Some(bytes) = data else {
            return Self::default();
        };
        match serde_json::from_slice(bytes) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Unparseable push payload ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

/// A notification ready to display
#[derive(Debug, Clone)]
pub struct Notification {
    /// Dismissal handle
    pub tag: Uuid,
    pub title: String,
    pub body: String,
    /// Click target, relative to the worker origin
    pub url: String,
}

impl Notification {
    /// Build from a payload, filling defaults per field
    pub fn from_payload(payload: PushPayload) -> Self {
        Self {
            tag: Uuid::new_v4(),
            title: payload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: payload.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            url: payload.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
        }
    }
}
