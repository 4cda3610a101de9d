//! Remote alert notifiers

use crate::NotifyError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Remote alerting channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError>;

    /// Short name for log lines
    fn name(&self) -> &'static str;
}

/// Writes alerts to the log; the default when no remote channel is set up
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        log::warn!("{subject}\n{body}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Keeps every notification in memory
///
/// Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(subject, body)` pairs in delivery order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|_| NotifyError::Rejected("notification log poisoned".into()))?
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
