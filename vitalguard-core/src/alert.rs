//! Human-readable alert messages
//!
//! The aggregator decides *when* to alert; this module only decides *what* the
//! message says. Composition is a pure function so the dispatcher stays
//! stateless.

use crate::status::AlertRequest;
use serde::{Deserialize, Serialize};

/// Subject and body handed to a notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    pub fn compose(request: &AlertRequest) -> Self {
        let status = request.level.as_str();
        let bpm = request
            .bpm
            .map(|b| format!("{b:.1}"))
            .unwrap_or_else(|| "unknown".to_string());
        let temperature = if request.temperature > 0.0 {
            format!("{:.1}°C", request.temperature)
        } else {
            "unknown".to_string()
        };
        let stress = request.stress.map(|s| s.as_str()).unwrap_or("None");

        let subject = format!("Health Alert: {status} Condition Detected");
        let body = format!(
            "The health monitoring system has detected a {status} condition.\n\n\
             Current Readings:\n\
             - BPM: {bpm}\n\
             - Temperature: {temperature}\n\
             - Stress Level: {stress}"
        );

        Self { subject, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusLevel;
    use crate::stress::StressLabel;

    #[test]
    fn critical_message() {
        let message = AlertMessage::compose(&AlertRequest {
            level: StatusLevel::Critical,
            bpm: Some(130.0),
            temperature: 36.6,
            stress: Some(StressLabel::Normal),
            sequence: 1,
        });

        assert_eq!(message.subject, "Health Alert: Critical Condition Detected");
        assert_eq!(
            message.body,
            "The health monitoring system has detected a Critical condition.\n\n\
             Current Readings:\n- BPM: 130.0\n- Temperature: 36.6°C\n- Stress Level: Normal"
        );
    }

    #[test]
    fn unknown_readings_are_spelled_out() {
        let message = AlertMessage::compose(&AlertRequest {
            level: StatusLevel::Warning,
            bpm: None,
            temperature: 0.0,
            stress: None,
            sequence: 2,
        });

        assert!(message.body.contains("- BPM: unknown"));
        assert!(message.body.contains("- Temperature: unknown"));
        assert!(message.body.contains("- Stress Level: None"));
    }
}
