//! Fire-and-forget alert delivery
//!
//! The dispatcher is stateless: pacing and the per-episode cap live in the
//! status aggregator. It formats the message and hands it to the notifier on
//! a detached task, so a slow or dead notification channel never delays the
//! aggregator tick. Failures are logged and dropped, never retried.

use crate::notify::Notifier;
use std::sync::Arc;
use tokio::task::JoinHandle;
use vitalguard_core::{AlertMessage, AlertRequest};

#[derive(Clone)]
pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl AlertDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Spawn delivery of one alert
    ///
    /// The handle resolves to whether delivery succeeded. Callers normally
    /// drop it.
    pub fn dispatch(&self, request: &AlertRequest) -> JoinHandle<bool> {
        let message = AlertMessage::compose(request);
        let notifier = Arc::clone(&self.notifier);
        let sequence = request.sequence;

        log::info!("dispatching alert #{sequence} via {}: {}", notifier.name(), message.subject);

        tokio::spawn(async move {
            match notifier.notify(&message.subject, &message.body).await {
                Ok(()) => {
                    log::info!("alert #{sequence} delivered");
                    true
                }
                Err(err) => {
                    log::error!("alert #{sequence} not delivered via {}: {err}", notifier.name());
                    false
                }
            }
        })
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("notifier", &self.notifier.name())
            .finish()
    }
}
