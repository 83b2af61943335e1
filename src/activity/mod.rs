//! Activity log engine
//!
//! Every successful mutation appends exactly one entry; the append is the
//! sole side effect the downstream KPIs depend on. Appends inside mutation
//! flows are best-effort: the user-visible action already succeeded, so a
//! failed append is logged and swallowed. Notification dispatch happens
//! after a successful append, detached, and can never affect the caller.

pub mod notify;

use bson::doc;
use std::sync::Arc;
use tracing::warn;

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{
    actions, ActivityDoc, SpaceDoc, ACTIVITY_COLLECTION, SPACE_COLLECTION,
};
use crate::types::Result;

pub use notify::{NotificationEvent, Notifier, TracingNotifier};

/// Append-only activity logger with fire-and-forget notification hooks
#[derive(Clone)]
pub struct ActivityLogger {
    activity: MongoCollection<ActivityDoc>,
    spaces: MongoCollection<SpaceDoc>,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl ActivityLogger {
    pub async fn new(client: &MongoClient, notifiers: Vec<Arc<dyn Notifier>>) -> Result<Self> {
        Ok(Self {
            activity: client.collection(ACTIVITY_COLLECTION).await?,
            spaces: client.collection(SPACE_COLLECTION).await?,
            notifiers,
        })
    }

    /// Append one entry. On success, dispatches notification hooks without
    /// waiting for their result.
    pub async fn log(
        &self,
        space_id: &str,
        actor_email: &str,
        action: &str,
        resource: Option<(&str, &str)>,
        metadata: serde_json::Value,
    ) -> Result<()> {
        let entry = ActivityDoc::new(
            space_id.to_string(),
            actor_email.to_string(),
            action.to_string(),
            resource.map(|(rt, rid)| (rt.to_string(), rid.to_string())),
            metadata.clone(),
        );

        self.activity.insert_one(entry).await?;

        self.dispatch_notifications(space_id, actor_email, action, metadata)
            .await;

        Ok(())
    }

    /// Best-effort variant used inside mutation flows: a failed append is
    /// recorded in the diagnostics log, never propagated.
    pub async fn log_best_effort(
        &self,
        space_id: &str,
        actor_email: &str,
        action: &str,
        resource: Option<(&str, &str)>,
        metadata: serde_json::Value,
    ) {
        if let Err(e) = self
            .log(space_id, actor_email, action, resource, metadata)
            .await
        {
            warn!(space_id, action, "activity append failed: {}", e);
        }
    }

    async fn dispatch_notifications(
        &self,
        space_id: &str,
        actor_email: &str,
        action: &str,
        metadata: serde_json::Value,
    ) {
        if self.notifiers.is_empty() {
            return;
        }

        // The org id rides along so collaborators can route per-tenant
        // channels; a failed lookup skips dispatch, nothing more.
        let org_id = match self.spaces.find_one(doc! { "space_id": space_id }).await {
            Ok(Some(space)) => space.org_id,
            Ok(None) => {
                warn!(space_id, "notification skipped: space not found");
                return;
            }
            Err(e) => {
                warn!(space_id, "notification skipped: {}", e);
                return;
            }
        };

        let event = NotificationEvent {
            space_id: space_id.to_string(),
            org_id,
            actor_email: actor_email.to_string(),
            action: action.to_string(),
            metadata,
        };

        for notifier in &self.notifiers {
            let notifier = Arc::clone(notifier);
            let event = event.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.notify(event).await {
                    warn!("notifier '{}' failed: {}", notifier.name(), e);
                }
            });
        }
    }

    /// Record a portal visit for `(space_id, email)`.
    ///
    /// "First visit" is derived, not stored: it is the absence of any prior
    /// visit entry for the pair. A lookup failure is treated as a first
    /// visit (fail-open) so a degraded database read never blocks the
    /// visit-logging UX. Returns the action tag that was logged.
    pub async fn record_portal_visit(
        &self,
        space_id: &str,
        email: &str,
    ) -> Result<&'static str> {
        let prior = self
            .activity
            .find_one(doc! {
                "space_id": space_id,
                "actor_email": email.to_lowercase(),
                "action": { "$in": [actions::PORTAL_FIRST_VISIT, actions::PORTAL_VISIT] },
            })
            .await;

        let first = match prior {
            Ok(existing) => existing.is_none(),
            Err(e) => {
                warn!(space_id, "first-visit lookup failed, assuming first: {}", e);
                true
            }
        };

        let action = if first {
            actions::PORTAL_FIRST_VISIT
        } else {
            actions::PORTAL_VISIT
        };

        self.log(space_id, email, action, None, serde_json::Value::Null)
            .await?;
        Ok(action)
    }
}
