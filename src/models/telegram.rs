//! Inbound Telegram update payloads.
//!
//! Only the fields the bot acts on are modelled; everything else in the
//! update is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// A single webhook update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
}

/// The message carried by an update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<Voice>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,
}

/// Voice note metadata; the audio itself is fetched separately by `file_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Voice {
    pub file_id: String,
    /// Duration in seconds as reported by the sender's client
    pub duration: u32,
}

/// Shared geolocation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}
