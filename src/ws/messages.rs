//! Frames exchanged with the currency assignment feed.
//!
//! Every frame is a JSON object tagged by its `type` field:
//!
//! ```json
//! {"type": "heartbeat"}
//! {"type": "message", "id": 456, "payload": {...}}
//! {"type": "error", "id": 456, "message": "..."}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::WsError;
use crate::conversion::ConversionResponse;

/// Correlation id chosen by the feed; echoed back on every response.
pub type MessageId = u64;

/// A conversion request as it arrives off the wire.
///
/// The payload is kept as raw JSON so that a malformed payload can still be answered with an
/// [`OutboundMessage::ErrorResponse`] carrying the request id.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestFrame {
    pub id: MessageId,
    pub payload: Value,
}

impl RequestFrame {
    #[must_use]
    pub fn new(id: MessageId, payload: Value) -> Self {
        Self { id, payload }
    }
}

/// Frames received from the feed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundMessage {
    Heartbeat,
    #[serde(rename = "message")]
    ConversionRequest(RequestFrame),
}

impl InboundMessage {
    /// Decode a text frame. Unknown `type` tags and malformed JSON are both decode errors.
    pub fn decode(text: &str) -> Result<Self, WsError> {
        serde_json::from_str(text).map_err(WsError::MessageParse)
    }
}

/// Frames sent to the feed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Heartbeat,
    #[serde(rename = "message")]
    ConversionResponse {
        id: MessageId,
        payload: ConversionResponse,
    },
    #[serde(rename = "error")]
    ErrorResponse { id: MessageId, message: String },
}

impl OutboundMessage {
    /// The request id this frame answers, if any.
    #[must_use]
    pub fn id(&self) -> Option<MessageId> {
        match self {
            Self::Heartbeat => None,
            Self::ConversionResponse { id, .. } | Self::ErrorResponse { id, .. } => Some(*id),
        }
    }

    pub fn encode(&self) -> Result<String, WsError> {
        serde_json::to_string(self).map_err(WsError::Encode)
    }
}
