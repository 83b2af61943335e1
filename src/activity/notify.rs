//! Notification hook seam
//!
//! Chat/Slack/Teams delivery belongs to external collaborators. This core
//! only emits an event after a successful activity append, fire-and-forget:
//! dispatch never blocks the caller and failures are only logged.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::types::Result;

/// Event handed to notification collaborators
#[derive(Clone, Debug, Serialize)]
pub struct NotificationEvent {
    pub space_id: String,
    pub org_id: String,
    pub actor_email: String,
    pub action: String,
    pub metadata: serde_json::Value,
}

/// A notification collaborator. Implementations are invoked in a detached
/// task; returning an error only produces a warning in the logs.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable name for diagnostics
    fn name(&self) -> &str;

    async fn notify(&self, event: NotificationEvent) -> Result<()>;
}

/// Dev notifier that writes events to the log instead of delivering them
#[derive(Clone, Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn notify(&self, event: NotificationEvent) -> Result<()> {
        info!(
            space_id = %event.space_id,
            action = %event.action,
            actor = %event.actor_email,
            "notification event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracing_notifier_accepts_events() {
        let notifier = TracingNotifier;
        let event = NotificationEvent {
            space_id: "s".into(),
            org_id: "o".into(),
            actor_email: "client@example.com".into(),
            action: "task.completed".into(),
            metadata: serde_json::json!({}),
        };
        assert!(notifier.notify(event).await.is_ok());
        assert_eq!(notifier.name(), "tracing");
    }
}
