//! Remote Control and Alert Connectors for VitalGuard
//!
//! ## Overview
//!
//! Two outward-facing surfaces sit on top of the core engine:
//!
//! - **Control channel**: a remote client starts and stops a periodic feed of
//!   the latest vital signs over a persistent JSON connection.
//! - **Alert notifiers**: the aggregator's alert requests are formatted and
//!   delivered to a remote channel, best effort.
//!
//! ```text
//!                      ┌───────────────┐   frames    ┌────────┐
//! SharedSnapshot ────→ │ run_session   │ ──────────→ │ client │
//!                      │ (per client)  │ ←────────── │        │
//!                      └───────────────┘  commands   └────────┘
//!
//! AlertRequest ──→ AlertDispatcher ──spawn──→ Notifier (log | webhook)
//! ```
//!
//! ## Transport Selection
//!
//! ### WebSocket (feature `websocket`)
//! - axum server, one task per connection
//! - Any reachable client can control streaming; deploy on a trusted network
//!
//! ### HTTP webhook (feature `http`)
//! - One POST per alert via `ureq`, bearer or basic auth
//! - No retries: the aggregator paces alerts, not the transport
//!
//! Session logic is written against [`ControlTransport`], so it is tested over
//! in-memory channels without a socket.
//!
//! ## Error Handling
//!
//! - Malformed client messages become `{"error": ...}` replies; the
//!   connection stays open.
//! - Transport failures end only the affected session.
//! - Notifier failures are logged and dropped.

pub mod dispatcher;
pub mod notify;
pub mod protocol;
pub mod session;
pub mod shutdown;

#[cfg(feature = "websocket")]
pub mod websocket;

#[cfg(feature = "http")]
pub mod webhook;

// Re-export common types
pub use dispatcher::AlertDispatcher;
pub use notify::{LogNotifier, MemoryNotifier, Notifier};
pub use protocol::{ClientCommand, ProtocolError, ServerMessage, StreamFrame};
pub use session::{run_session, ControlSession, ControlTransport, SessionState};
pub use shutdown::{Shutdown, ShutdownTrigger};

#[cfg(feature = "http")]
pub use webhook::{WebhookConfig, WebhookNotifier};

use thiserror::Error;

/// Control connection errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Alert delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("server error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("notification rejected: {0}")]
    Rejected(String),

    #[error("configuration error: {0}")]
    Config(String),
}
