//! Control session: start/stop streaming over one client connection
//!
//! ## Overview
//!
//! ```text
//!              START (reply + one frame now)
//!   ┌──────┐ ─────────────────────────────→ ┌───────────┐
//!   │ Idle │                                │ Streaming │──┐ frame every
//!   └──────┘ ←───────────────────────────── └───────────┘←─┘ `cadence`
//!      ↑           STOP (reply)                   │
//!      └──────────── connection lost ─────────────┘
//! ```
//!
//! [`ControlSession`] is the pure state machine. [`run_session`] drives it
//! against any [`ControlTransport`], interleaving client messages, the stream
//! ticker and the shutdown signal in one `select!` loop. Each connection gets
//! its own task, so a slow client never delays another.
//!
//! ## Degraded Reads
//!
//! Frames are built from a non-blocking snapshot read. If a writer holds the
//! lock at that instant, the session resends its last known frame rather
//! than waiting or erroring: the feed never goes silent.

use crate::protocol::{ClientCommand, ServerMessage, StreamFrame};
use crate::shutdown::Shutdown;
use crate::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use vitalguard_core::{SharedSnapshot, Snapshot};

pub const STATUS_STARTED: &str = "Monitoring started";
pub const STATUS_STOPPED: &str = "Monitoring stopped";
pub const STATUS_ALREADY_ACTIVE: &str = "Monitoring already active";
pub const STATUS_ALREADY_STOPPED: &str = "Monitoring already stopped";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Streaming,
}

/// What to do after a client message
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub message: ServerMessage,
    /// Send a frame right away and restart the cadence
    pub stream_now: bool,
}

impl Reply {
    fn status(text: &str) -> Self {
        Self { message: ServerMessage::status(text), stream_now: false }
    }
}

/// Per-connection state machine
#[derive(Debug, Default)]
pub struct ControlSession {
    state: SessionState,
    last_known: Snapshot,
}

impl ControlSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.state == SessionState::Streaming
    }

    /// Handle one text message; `None` for blank messages
    pub fn handle(&mut self, text: &str) -> Option<Reply> {
        if text.trim().is_empty() {
            return None;
        }

        let command = match ClientCommand::parse(text) {
            Ok(command) => command,
            Err(err) => {
                log::debug!("rejected client message: {err}");
                return Some(Reply { message: ServerMessage::error(err), stream_now: false });
            }
        };

        let reply = match (command, self.state) {
            (ClientCommand::StartMonitoring, SessionState::Idle) => {
                self.state = SessionState::Streaming;
                Reply { message: ServerMessage::status(STATUS_STARTED), stream_now: true }
            }
            (ClientCommand::StartMonitoring, SessionState::Streaming) => {
                Reply::status(STATUS_ALREADY_ACTIVE)
            }
            (ClientCommand::StopMonitoring, SessionState::Streaming) => {
                self.state = SessionState::Idle;
                Reply::status(STATUS_STOPPED)
            }
            (ClientCommand::StopMonitoring, SessionState::Idle) => {
                Reply::status(STATUS_ALREADY_STOPPED)
            }
        };
        log::info!("client {} -> {:?}", command.as_str(), self.state);
        Some(reply)
    }

    /// Frame from the current snapshot, or the last known one if busy
    pub fn frame(&mut self, snapshot: &SharedSnapshot) -> StreamFrame {
        match snapshot.try_read() {
            Some(current) => self.last_known = current,
            None => log::debug!("snapshot busy, repeating last frame"),
        }
        StreamFrame::from(&self.last_known)
    }

    pub fn disconnect(&mut self) {
        self.state = SessionState::Idle;
    }
}

/// Bidirectional text message connection
#[async_trait]
pub trait ControlTransport: Send {
    /// Next text message; `None` once the peer has gone
    async fn recv(&mut self) -> Option<Result<String, TransportError>>;

    async fn send(&mut self, text: String) -> Result<(), TransportError>;
}

async fn send_message<T: ControlTransport>(
    transport: &mut T,
    message: &ServerMessage,
) -> Result<(), TransportError> {
    let text = message.to_json()?;
    transport.send(text).await
}

async fn send_frame<T: ControlTransport>(
    transport: &mut T,
    session: &mut ControlSession,
    snapshot: &SharedSnapshot,
) -> Result<(), TransportError> {
    let frame = session.frame(snapshot);
    send_message(transport, &ServerMessage::Reading(frame)).await
}

async fn serve_messages<T: ControlTransport>(
    transport: &mut T,
    session: &mut ControlSession,
    snapshot: &SharedSnapshot,
    cadence: Duration,
    shutdown: &mut Shutdown,
) -> Result<(), TransportError> {
    let mut ticker = interval_at(Instant::now() + cadence, cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.recv() => return Ok(()),
            incoming = transport.recv() => {
                let text = match incoming {
                    None => return Ok(()),
                    Some(result) => result?,
                };
                if let Some(reply) = session.handle(&text) {
                    send_message(transport, &reply.message).await?;
                    if reply.stream_now {
                        send_frame(transport, session, snapshot).await?;
                        ticker.reset();
                    }
                }
            }
            _ = ticker.tick(), if session.is_streaming() => {
                send_frame(transport, session, snapshot).await?;
            }
        }
    }
}

/// Serve one client until it disconnects or shutdown is requested
///
/// Transport failures end the session; they are logged and never propagate
/// to other sessions.
pub async fn run_session<T: ControlTransport>(
    mut transport: T,
    snapshot: SharedSnapshot,
    cadence: Duration,
    mut shutdown: Shutdown,
) -> SessionState {
    let mut session = ControlSession::new();
    log::info!("control client connected");

    let result = serve_messages(&mut transport, &mut session, &snapshot, cadence, &mut shutdown).await;
    match result {
        Ok(()) => log::info!("control client disconnected"),
        Err(err) => log::warn!("control session ended: {err}"),
    }

    session.disconnect();
    session.state()
}
