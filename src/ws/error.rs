#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// WebSocket error variants.
///
/// Every variant except [`WsError::MessageParse`] ends the session it occurred in.
#[non_exhaustive]
#[derive(Debug)]
pub enum WsError {
    /// Error establishing the WebSocket connection
    Connection(tokio_tungstenite::tungstenite::Error),
    /// The handshake did not complete within the configured connect timeout
    ConnectTimeout(Duration),
    /// Error writing a frame to the socket
    Send(tokio_tungstenite::tungstenite::Error),
    /// A frame could not be written within the send timeout
    SendTimeout(Duration),
    /// Error reading a frame from the socket
    Receive(tokio_tungstenite::tungstenite::Error),
    /// WebSocket connection was closed
    ConnectionClosed,
    /// No heartbeat was received from the peer within the timeout
    HeartbeatTimeout {
        /// How long the peer had been silent when the connection was declared stale
        elapsed: Duration,
    },
    /// Error parsing a WebSocket message
    MessageParse(serde_json::Error),
    /// Error encoding an outbound message
    Encode(serde_json::Error),
    /// A session activity stopped without reporting an error (panic or abort)
    Task(String),
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "WebSocket connection error: {e}"),
            Self::ConnectTimeout(after) => write!(f, "WebSocket connect timed out after {after:?}"),
            Self::Send(e) => write!(f, "Failed to send WebSocket frame: {e}"),
            Self::SendTimeout(after) => write!(f, "WebSocket send timed out after {after:?}"),
            Self::Receive(e) => write!(f, "Failed to receive WebSocket frame: {e}"),
            Self::ConnectionClosed => write!(f, "WebSocket connection closed"),
            Self::HeartbeatTimeout { elapsed } => {
                write!(f, "Heartbeat timeout: no heartbeat received for {elapsed:?}")
            }
            Self::MessageParse(e) => write!(f, "Failed to parse WebSocket message: {e}"),
            Self::Encode(e) => write!(f, "Failed to encode WebSocket message: {e}"),
            Self::Task(reason) => write!(f, "Session activity stopped unexpectedly: {reason}"),
        }
    }
}

impl StdError for WsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Connection(e) | Self::Send(e) | Self::Receive(e) => Some(e),
            Self::MessageParse(e) | Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

// Integration with main Error type
impl From<WsError> for crate::error::Error {
    fn from(e: WsError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::WebSocket, e)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for crate::error::Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        crate::error::Error::with_source(crate::error::Kind::WebSocket, WsError::Connection(e))
    }
}
