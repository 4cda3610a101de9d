//! WebSocket control server
//!
//! Every upgraded connection runs its own [`run_session`] task. The server
//! stops accepting on shutdown and open sessions end on the same signal.

use crate::session::{run_session, ControlTransport};
use crate::shutdown::Shutdown;
use crate::TransportError;
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use vitalguard_core::SharedSnapshot;

/// State shared by every connection
#[derive(Debug, Clone)]
pub struct ControlState {
    pub snapshot: SharedSnapshot,
    pub stream_interval: Duration,
    pub shutdown: Shutdown,
}

/// [`ControlTransport`] over an axum WebSocket
pub struct WebSocketTransport {
    socket: WebSocket,
}

impl WebSocketTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl ControlTransport for WebSocketTransport {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.socket.recv().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(_)) => return None,
                // Pings are answered by axum; binary frames are not part of the protocol
                Ok(_) => continue,
                Err(e) => return Some(Err(TransportError::Connection(e.to_string()))),
            }
        }
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.socket
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ControlState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        run_session(
            WebSocketTransport::new(socket),
            state.snapshot,
            state.stream_interval,
            state.shutdown,
        )
        .await;
    })
}

pub fn router(state: ControlState) -> Router {
    Router::new().route("/", get(ws_handler)).with_state(state)
}

/// Bind `addr` for [`serve`]
pub async fn bind(addr: &str) -> Result<TcpListener, TransportError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind { addr: addr.to_string(), source })
}

/// Accept control clients until shutdown
pub async fn serve(listener: TcpListener, state: ControlState) -> Result<(), TransportError> {
    let local: Option<SocketAddr> = listener.local_addr().ok();
    if let Some(addr) = local {
        log::info!("control server listening on ws://{addr}");
    }

    let mut shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.recv().await })
        .await
        .map_err(TransportError::Io)?;

    log::info!("control server stopped");
    Ok(())
}
