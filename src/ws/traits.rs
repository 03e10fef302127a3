//! Core traits for the WebSocket session.

use async_trait::async_trait;

use super::messages::{OutboundMessage, RequestFrame};

/// Answers conversion requests received by a session.
///
/// Implementations must always produce a frame: per-request failures are reported to the peer as
/// [`OutboundMessage::ErrorResponse`] rather than returned, so a bad request never ends the
/// session.
///
/// # Example
///
/// ```ignore
/// struct Echo;
///
/// #[async_trait]
/// impl Handler for Echo {
///     async fn handle(&self, request: RequestFrame) -> OutboundMessage {
///         OutboundMessage::ErrorResponse { id: request.id, message: "unsupported".to_owned() }
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, request: RequestFrame) -> OutboundMessage;
}
