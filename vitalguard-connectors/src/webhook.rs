//! HTTP webhook notifier
//!
//! ## Overview
//!
//! Posts each alert as `{"subject": ..., "body": ...}` JSON to a configured
//! URL, for relaying to mail, chat or paging services.
//!
//! ## Design Decisions
//!
//! - `ureq` is blocking, so every request runs on the blocking pool and the
//!   caller's executor thread stays free.
//! - Exactly one attempt per alert. The aggregator already paces alerts and
//!   a stale alert retried later is worse than a lost one.
//! - Non-2xx responses are errors; the response body is kept for the log.
//!
//! ## Example Usage
//!
//! ```rust
//! use vitalguard_connectors::webhook::{WebhookConfig, WebhookNotifier};
//!
//! let config = WebhookConfig::new("https://hooks.example.com/vitals")
//!     .bearer_token("secret")
//!     .timeout_secs(5);
//! let notifier = WebhookNotifier::new(config)?;
//! # Ok::<(), vitalguard_connectors::NotifyError>(())
//! ```

use crate::notify::Notifier;
use crate::NotifyError;
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Authentication methods
#[derive(Clone)]
pub enum AuthMethod {
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl AuthMethod {
    /// `Authorization` header value, if any
    pub fn header_value(&self) -> Option<String> {
        match self {
            AuthMethod::None => None,
            AuthMethod::Bearer(token) => Some(format!("Bearer {token}")),
            AuthMethod::Basic { username, password } => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                Some(format!("Basic {credentials}"))
            }
        }
    }
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Credentials stay out of logs
        match self {
            AuthMethod::None => f.write_str("None"),
            AuthMethod::Bearer(_) => f.write_str("Bearer(..)"),
            AuthMethod::Basic { username, .. } => write!(f, "Basic({username}, ..)"),
        }
    }
}

/// Webhook configuration
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
    pub auth: AuthMethod,
    pub headers: HashMap<String, String>,
    pub user_agent: String,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
            auth: AuthMethod::None,
            headers: HashMap::new(),
            user_agent: format!("VitalGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    subject: &'a str,
    body: &'a str,
}

/// Alert notifier posting to an HTTP endpoint
pub struct WebhookNotifier {
    config: WebhookConfig,
    agent: ureq::Agent,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
            return Err(NotifyError::Config("webhook URL must start with http:// or https://".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    fn build_request(&self) -> ureq::Request {
        let mut request = self.agent.post(&self.config.url);

        if let Some(value) = self.config.auth.header_value() {
            request = request.set("Authorization", &value);
        }

        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        request.set("Content-Type", "application/json")
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(&WebhookPayload { subject, body })
            .map_err(|e| NotifyError::Rejected(e.to_string()))?;
        let request = self.build_request();

        let response = tokio::task::spawn_blocking(move || request.send_string(&payload))
            .await
            .map_err(|e| NotifyError::Delivery(format!("webhook task failed: {e}")))?;

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, resp)) => Err(NotifyError::Status {
                status,
                message: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(NotifyError::Delivery(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = WebhookConfig::new("https://hooks.example.com")
            .bearer_token("t0ken")
            .timeout_secs(3)
            .header("X-Device", "ward-7");

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(config.headers.contains_key("X-Device"));
        match &config.auth {
            AuthMethod::Bearer(token) => assert_eq!(token, "t0ken"),
            other => panic!("wrong auth method: {other:?}"),
        }
        assert!(!format!("{config:?}").contains("t0ken"));
    }

    #[test]
    fn basic_auth_header_is_base64_encoded() {
        let config = WebhookConfig::new("https://hooks.example.com").basic_auth("alice", "s3cret");
        assert_eq!(config.auth.header_value().as_deref(), Some("Basic YWxpY2U6czNjcmV0"));
        assert!(!format!("{config:?}").contains("s3cret"));

        let notifier = WebhookNotifier::new(config).unwrap();
        let request = notifier.build_request();
        assert_eq!(request.header("Authorization"), Some("Basic YWxpY2U6czNjcmV0"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn bearer_and_none_headers() {
        assert_eq!(AuthMethod::Bearer("t0ken".into()).header_value().as_deref(), Some("Bearer t0ken"));
        assert_eq!(AuthMethod::None.header_value(), None);

        let notifier = WebhookNotifier::new(WebhookConfig::new("http://localhost:9000/hook")).unwrap();
        assert_eq!(notifier.build_request().header("Authorization"), None);
    }

    #[test]
    fn url_validation() {
        assert!(WebhookNotifier::new(WebhookConfig::new("hooks.example.com")).is_err());
        assert!(WebhookNotifier::new(WebhookConfig::new("http://localhost:9000/hook")).is_ok());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_delivery_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let notifier = WebhookNotifier::new(
            WebhookConfig::new("http://127.0.0.1:9/hook").timeout_secs(2),
        )
        .unwrap();

        let err = notifier.notify("subject", "body").await.unwrap_err();
        assert!(matches!(err, NotifyError::Delivery(_)), "{err:?}");
    }
}
