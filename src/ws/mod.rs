//! Connection lifecycle for the currency assignment feed.
//!
//! # Architecture
//!
//! - [`Session`]: one live socket. Runs a heartbeat emitter, a heartbeat watchdog and an inbound
//!   dispatcher as separate tasks, and ends as soon as any of them stops.
//! - [`Supervisor`]: opens sessions one after another, with a fixed backoff between them, until
//!   shut down.
//! - [`Handler`]: answers the conversion requests a session receives.
//!
//! # Example
//!
//! ```ignore
//! let shutdown = CancellationToken::new();
//! let supervisor = Supervisor::new(endpoint, Config::default(), Converter::new(rates));
//!
//! supervisor.run(shutdown).await;
//! ```

pub mod config;
pub mod error;
pub mod liveness;
pub mod messages;
pub mod session;
pub mod supervisor;
pub mod traits;

pub use config::Config;
#[expect(
    clippy::module_name_repetitions,
    reason = "WsError includes module name for clarity when used outside this module"
)]
pub use error::WsError;
pub use messages::{InboundMessage, MessageId, OutboundMessage, RequestFrame};
pub use session::{Activity, Session, SessionEnd, Termination};
pub use supervisor::{ConnectionState, Supervisor};
pub use traits::*;
