use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt as _, StreamExt as _};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::{self, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use super::config::Config;
use super::error::WsError;
use super::liveness::{LivenessClock, LivenessMonitor};
use super::messages::{InboundMessage, OutboundMessage};
use super::traits::Handler;

type WsSink<S> = SplitSink<WebSocketStream<S>, Message>;
type WsSource<S> = SplitStream<WebSocketStream<S>>;

const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(1);

/// The concurrent activities that make up a running session.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Sends a heartbeat frame every `heartbeat_interval`
    HeartbeatEmitter,
    /// Closes the connection once the peer has been silent for `heartbeat_timeout`
    Watchdog,
    /// Receives frames, records heartbeats and answers requests
    Dispatcher,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeartbeatEmitter => f.write_str("heartbeat emitter"),
            Self::Watchdog => f.write_str("heartbeat watchdog"),
            Self::Dispatcher => f.write_str("inbound dispatcher"),
        }
    }
}

/// Which activity ended a session, and why.
#[non_exhaustive]
#[derive(Debug)]
pub struct Termination {
    pub activity: Activity,
    pub error: WsError,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stopped: {}", self.activity, self.error)
    }
}

/// How [`Session::run`] returned.
#[non_exhaustive]
#[derive(Debug)]
pub enum SessionEnd {
    /// One of the activities stopped; the others were cancelled
    Terminated(Termination),
    /// The shutdown token was cancelled
    Interrupted,
}

/// Write half of the socket, shared by the emitter, the dispatcher and the watchdog.
///
/// Writes are serialized through the mutex and each one is bounded by `send_timeout`, so a stuck
/// peer cannot hold the lock forever.
struct Outbound<S> {
    sink: Arc<Mutex<WsSink<S>>>,
    send_timeout: Duration,
}

impl<S> Clone for Outbound<S> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            send_timeout: self.send_timeout,
        }
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Outbound<S> {
    async fn send(&self, message: &OutboundMessage) -> Result<(), WsError> {
        let text = message.encode()?;
        let mut sink = self.sink.lock().await;

        match timeout(self.send_timeout, sink.send(Message::Text(text.into()))).await {
            Ok(sent) => sent.map_err(WsError::Send),
            Err(_elapsed) => Err(WsError::SendTimeout(self.send_timeout)),
        }
    }

    async fn close(&self) {
        let mut sink = self.sink.lock().await;

        match timeout(self.send_timeout, sink.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "WebSocket close did not complete cleanly"),
            Err(_elapsed) => tracing::debug!("WebSocket close timed out"),
        }
    }
}

/// One live connection to the feed plus its liveness state.
///
/// A session is single use: [`Session::run`] consumes it, and the socket is closed by the time
/// `run` returns. `S` is the transport under the WebSocket framing, a TCP or TLS stream unless
/// the session was built with [`Session::from_stream`].
pub struct Session<S = MaybeTlsStream<TcpStream>> {
    endpoint: String,
    outbound: Outbound<S>,
    inbound: WsSource<S>,
    clock: LivenessClock,
    connected_at: Instant,
}

impl<S> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("connected_at", &self.connected_at)
            .field("last_heartbeat", &self.clock.last_beat())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Connect to `endpoint`. The liveness clock starts at connect time.
    pub async fn open(endpoint: &str, config: &Config) -> Result<Self, WsError> {
        let (stream, _) = timeout(config.connect_timeout, connect_async(endpoint))
            .await
            .map_err(|_elapsed| WsError::ConnectTimeout(config.connect_timeout))?
            .map_err(WsError::Connection)?;

        Ok(Self::from_stream(endpoint, stream, config))
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Wrap an already established WebSocket stream. The liveness clock starts now.
    #[must_use]
    pub fn from_stream(endpoint: &str, stream: WebSocketStream<S>, config: &Config) -> Self {
        let (sink, inbound) = stream.split();

        Self {
            endpoint: endpoint.to_owned(),
            outbound: Outbound {
                sink: Arc::new(Mutex::new(sink)),
                send_timeout: config.connect_timeout,
            },
            inbound,
            clock: LivenessClock::start(),
            connected_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Drive the connection until one activity stops or `shutdown` is cancelled.
    ///
    /// The heartbeat emitter, the watchdog and the dispatcher run as separate tasks, so a slow
    /// rate lookup in the dispatcher never delays heartbeats. The first task to finish decides the
    /// outcome. The remaining tasks are aborted and awaited, and the socket is closed, before
    /// this returns.
    pub async fn run<H: Handler>(
        self,
        config: &Config,
        handler: Arc<H>,
        shutdown: &CancellationToken,
    ) -> SessionEnd {
        let Self {
            endpoint,
            outbound,
            inbound,
            clock,
            connected_at,
        } = self;

        let mut activities = JoinSet::new();
        let emitter = activities
            .spawn(emit_heartbeats(outbound.clone(), config.heartbeat_interval))
            .id();
        let watchdog = activities
            .spawn(watch_liveness(
                clock.monitor(),
                outbound.clone(),
                config.heartbeat_timeout,
                config.watchdog_tick,
            ))
            .id();
        let dispatcher = activities
            .spawn(dispatch(
                inbound,
                clock,
                outbound.clone(),
                handler,
                config.show_messages,
            ))
            .id();

        let activity_of = |id: task::Id| {
            if id == emitter {
                Activity::HeartbeatEmitter
            } else if id == watchdog {
                Activity::Watchdog
            } else {
                debug_assert_eq!(id, dispatcher, "unknown session task");
                Activity::Dispatcher
            }
        };

        let end = tokio::select! {
            () = shutdown.cancelled() => SessionEnd::Interrupted,
            finished = activities.join_next_with_id() => {
                let termination = match finished {
                    Some(Ok((id, error))) => Termination {
                        activity: activity_of(id),
                        error,
                    },
                    Some(Err(e)) => Termination {
                        activity: activity_of(e.id()),
                        error: WsError::Task(e.to_string()),
                    },
                    None => Termination {
                        activity: Activity::Dispatcher,
                        error: WsError::ConnectionClosed,
                    },
                };
                SessionEnd::Terminated(termination)
            }
        };

        activities.shutdown().await;
        outbound.close().await;

        tracing::debug!(
            endpoint = %endpoint,
            connected_for = ?connected_at.elapsed(),
            "Session closed"
        );

        end
    }
}

async fn emit_heartbeats<S>(outbound: Outbound<S>, every: Duration) -> WsError
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let every = every.max(MIN_HEARTBEAT_INTERVAL);
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(e) = outbound.send(&OutboundMessage::Heartbeat).await {
            tracing::error!(error = %e, "Error sending heartbeat");
            return e;
        }
        tracing::trace!("Sent heartbeat");
    }
}

async fn watch_liveness<S>(
    monitor: LivenessMonitor,
    outbound: Outbound<S>,
    heartbeat_timeout: Duration,
    tick: Duration,
) -> WsError
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let silence = monitor.stale(heartbeat_timeout, tick).await;

    tracing::warn!(
        ?silence,
        timeout = ?heartbeat_timeout,
        "No heartbeat received in time, closing connection"
    );
    outbound.close().await;

    WsError::HeartbeatTimeout { elapsed: silence }
}

async fn dispatch<S, H>(
    mut inbound: WsSource<S>,
    clock: LivenessClock,
    outbound: Outbound<S>,
    handler: Arc<H>,
    show_messages: bool,
) -> WsError
where
    S: AsyncRead + AsyncWrite + Unpin,
    H: Handler,
{
    loop {
        let text = match inbound.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(frame))) => {
                tracing::debug!(?frame, "Peer closed the connection");
                return WsError::ConnectionClosed;
            }
            Some(Ok(Message::Binary(bytes))) => {
                tracing::warn!(len = bytes.len(), "Ignoring binary WebSocket frame");
                continue;
            }
            // Ping/pong replies are handled by tungstenite
            Some(Ok(_)) => continue,
            Some(Err(e)) => return WsError::Receive(e),
            None => return WsError::ConnectionClosed,
        };

        tracing::trace!(text = %text.as_str(), "Received WebSocket text message");

        let request = match InboundMessage::decode(text.as_str()) {
            Ok(InboundMessage::Heartbeat) => {
                clock.beat();
                tracing::debug!("Received heartbeat");
                continue;
            }
            Ok(InboundMessage::ConversionRequest(request)) => request,
            Err(e) => {
                tracing::warn!(text = %text.as_str(), error = %e, "Error decoding message");
                continue;
            }
        };

        let id = request.id;
        let logged = show_messages.then(|| request.clone());
        let response = handler.handle(request).await;

        if let Some(request) = logged {
            tracing::info!("Request message:\n{}", pretty(&request));
            tracing::info!("Response message:\n{}", pretty(&response));
        }

        if let Err(e) = outbound.send(&response).await {
            tracing::error!(id, error = %e, "Unable to send response");
            return e;
        }
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
