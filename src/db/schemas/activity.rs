//! Activity log schema
//!
//! Append-only and immutable once written. The log doubles as the audit
//! trail and as the only record of state transitions: "became active" and
//! "became completed" timestamps are reconstructed from
//! `project.status_changed` entries, there is no separate transition table.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for activity entries
pub const ACTIVITY_COLLECTION: &str = "activity_log";

/// Action tags recorded by this core
pub mod actions {
    pub const TASK_COMPLETED: &str = "task.completed";
    pub const TASK_REOPENED: &str = "task.reopened";
    pub const RESPONSE_SAVED: &str = "response.saved";
    pub const FILE_UPLOADED: &str = "file.uploaded";
    pub const FILE_DELETED: &str = "file.deleted";
    pub const PORTAL_FIRST_VISIT: &str = "portal.first_visit";
    pub const PORTAL_VISIT: &str = "portal.visit";
    pub const STATUS_CHANGED: &str = "project.status_changed";
}

/// Activity log entry stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ActivityDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Space the action happened in
    pub space_id: String,

    /// Actor email; works for both staff and stakeholder identities
    pub actor_email: String,

    /// Action tag, see [`actions`]
    pub action: String,

    /// Optional resource reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Free-form metadata; status changes record `{"from": .., "to": ..}`
    #[serde(default)]
    pub detail: serde_json::Value,

    /// When the action happened
    pub occurred_at: DateTime,
}

impl Default for ActivityDoc {
    fn default() -> Self {
        Self {
            _id: None,
            metadata: Metadata::default(),
            space_id: String::new(),
            actor_email: String::new(),
            action: String::new(),
            resource_type: None,
            resource_id: None,
            detail: serde_json::Value::Null,
            occurred_at: DateTime::MIN,
        }
    }
}

impl ActivityDoc {
    /// Create a new entry timestamped now
    pub fn new(
        space_id: String,
        actor_email: String,
        action: String,
        resource: Option<(String, String)>,
        detail: serde_json::Value,
    ) -> Self {
        let (resource_type, resource_id) = match resource {
            Some((rt, rid)) => (Some(rt), Some(rid)),
            None => (None, None),
        };
        Self {
            _id: None,
            metadata: Metadata::new(),
            space_id,
            actor_email: actor_email.to_lowercase(),
            action,
            resource_type,
            resource_id,
            detail,
            occurred_at: DateTime::now(),
        }
    }

    /// The `to` status recorded by a `project.status_changed` entry, if any
    pub fn status_changed_to(&self) -> Option<&str> {
        if self.action != actions::STATUS_CHANGED {
            return None;
        }
        self.detail.get("to").and_then(|v| v.as_str())
    }

    /// Whether this entry records a portal visit (first or repeat)
    pub fn is_portal_visit(&self) -> bool {
        self.action == actions::PORTAL_FIRST_VISIT || self.action == actions::PORTAL_VISIT
    }
}

impl IntoIndexes for ActivityDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "space_id": 1, "occurred_at": 1 },
                Some(
                    IndexOptions::builder()
                        .name("space_time_index".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "space_id": 1, "actor_email": 1 },
                Some(
                    IndexOptions::builder()
                        .name("space_actor_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for ActivityDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_changed_to() {
        let entry = ActivityDoc::new(
            "s".into(),
            "ops@example.com".into(),
            actions::STATUS_CHANGED.into(),
            None,
            serde_json::json!({ "from": "draft", "to": "active" }),
        );
        assert_eq!(entry.status_changed_to(), Some("active"));

        let other = ActivityDoc::new(
            "s".into(),
            "ops@example.com".into(),
            actions::TASK_COMPLETED.into(),
            None,
            serde_json::json!({ "to": "active" }),
        );
        assert_eq!(other.status_changed_to(), None);
    }

    #[test]
    fn test_actor_email_lowercased() {
        let entry = ActivityDoc::new(
            "s".into(),
            "Client@Example.COM".into(),
            actions::PORTAL_VISIT.into(),
            None,
            serde_json::Value::Null,
        );
        assert_eq!(entry.actor_email, "client@example.com");
        assert!(entry.is_portal_visit());
    }
}
