//! Remote control wire format
//!
//! JSON text messages over a persistent connection.
//!
//! ```text
//! client → server   {"command": "START_MONITORING"}
//!                   {"command": "STOP_MONITORING"}
//! server → client   {"status": "Monitoring started"}
//!                   {"error": "Unknown command"}
//!                   {"bpm": 72.0, "temperature": 36.6, "stress_level": "Normal"}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vitalguard_core::Snapshot;

pub const START_MONITORING: &str = "START_MONITORING";
pub const STOP_MONITORING: &str = "STOP_MONITORING";

/// Malformed client message
///
/// The `Display` text is the exact string sent back in `{"error": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Invalid JSON format")]
    InvalidJson,
    #[error("Unknown command")]
    UnknownCommand,
}

/// Command sent by the remote client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    StartMonitoring,
    StopMonitoring,
}

impl ClientCommand {
    /// Decode one text message
    ///
    /// Well-formed JSON without a recognized string `command` field is an
    /// unknown command, not a format error.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| ProtocolError::InvalidJson)?;

        match value.get("command").and_then(|c| c.as_str()) {
            Some(START_MONITORING) => Ok(ClientCommand::StartMonitoring),
            Some(STOP_MONITORING) => Ok(ClientCommand::StopMonitoring),
            _ => Err(ProtocolError::UnknownCommand),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ClientCommand::StartMonitoring => START_MONITORING,
            ClientCommand::StopMonitoring => STOP_MONITORING,
        }
    }
}

/// Latest values as streamed to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    pub bpm: f64,
    pub temperature: f64,
    pub stress_level: String,
}

impl From<&Snapshot> for StreamFrame {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            bpm: snapshot.bpm,
            temperature: snapshot.temperature,
            stress_level: snapshot.stress_label().to_string(),
        }
    }
}

/// Any message sent to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Status { status: String },
    Error { error: String },
    Reading(StreamFrame),
}

impl ServerMessage {
    pub fn status(text: impl Into<String>) -> Self {
        ServerMessage::Status { status: text.into() }
    }

    pub fn error(err: ProtocolError) -> Self {
        ServerMessage::Error { error: err.to_string() }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<StreamFrame> for ServerMessage {
    fn from(frame: StreamFrame) -> Self {
        ServerMessage::Reading(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalguard_core::StressLabel;

    #[test]
    fn parses_commands() {
        assert_eq!(
            ClientCommand::parse(r#"{"command": "START_MONITORING"}"#),
            Ok(ClientCommand::StartMonitoring)
        );
        assert_eq!(
            ClientCommand::parse(r#"{"command":"STOP_MONITORING","extra":1}"#),
            Ok(ClientCommand::StopMonitoring)
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(ClientCommand::parse("not json"), Err(ProtocolError::InvalidJson));
        assert_eq!(ClientCommand::parse("{\"command\":"), Err(ProtocolError::InvalidJson));
        assert_eq!(ClientCommand::parse(r#"{"command":"REBOOT"}"#), Err(ProtocolError::UnknownCommand));
        assert_eq!(ClientCommand::parse(r#"{"command":1}"#), Err(ProtocolError::UnknownCommand));
        assert_eq!(ClientCommand::parse("[1,2]"), Err(ProtocolError::UnknownCommand));
        assert_eq!(ClientCommand::parse(r#"{"command":"start_monitoring"}"#), Err(ProtocolError::UnknownCommand));
    }

    #[test]
    fn wire_shapes() {
        let status = ServerMessage::status("Monitoring started").to_json().unwrap();
        assert_eq!(status, r#"{"status":"Monitoring started"}"#);

        let error = ServerMessage::error(ProtocolError::InvalidJson).to_json().unwrap();
        assert_eq!(error, r#"{"error":"Invalid JSON format"}"#);

        let snapshot = Snapshot {
            bpm: 72.5,
            temperature: 36.6,
            stress: Some(StressLabel::NoContact),
            ..Snapshot::default()
        };
        let reading = ServerMessage::from(StreamFrame::from(&snapshot)).to_json().unwrap();
        assert_eq!(reading, r#"{"bpm":72.5,"temperature":36.6,"stress_level":"No-Contact"}"#);
    }

    #[test]
    fn empty_snapshot_streams_sentinels() {
        let frame = StreamFrame::from(&Snapshot::default());
        assert_eq!(frame.bpm, 0.0);
        assert_eq!(frame.temperature, 0.0);
        assert_eq!(frame.stress_level, "None");
    }
}
