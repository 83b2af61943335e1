//! Space document schema
//!
//! A space is a tenant-owned unit of implementation work with a
//! draft/active/completed/archived lifecycle. Engagement score and level are
//! written by an external scoring job and only read here.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for spaces
pub const SPACE_COLLECTION: &str = "spaces";

/// Space lifecycle status
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpaceStatus {
    #[default]
    Draft,
    Active,
    Completed,
    Archived,
}

impl SpaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for SpaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Space document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SpaceDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Canonical space id token
    pub space_id: String,

    /// Owning organization (exactly one per space)
    pub org_id: String,

    /// Display name
    pub name: String,

    /// Client the work is being delivered for
    #[serde(default)]
    pub client_name: String,

    /// Lifecycle status; transitions are staff-only
    #[serde(default)]
    pub status: SpaceStatus,

    /// Target go-live date as a calendar date string (`YYYY-MM-DD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,

    /// Engagement score written by the external scoring job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,

    /// Engagement level label written by the external scoring job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_level: Option<String>,
}

impl SpaceDoc {
    /// Create a new draft space
    pub fn new(space_id: String, org_id: String, name: String, client_name: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            space_id,
            org_id,
            name,
            client_name,
            status: SpaceStatus::Draft,
            target_date: None,
            engagement_score: None,
            engagement_level: None,
        }
    }
}

impl IntoIndexes for SpaceDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "space_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("space_id_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "org_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("org_id_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for SpaceDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(SpaceStatus::Completed).unwrap();
        assert_eq!(json, serde_json::json!("completed"));
        let back: SpaceStatus = serde_json::from_value(serde_json::json!("archived")).unwrap();
        assert_eq!(back, SpaceStatus::Archived);
    }

    #[test]
    fn test_new_space_starts_in_draft() {
        let space = SpaceDoc::new("s".into(), "org".into(), "Acme rollout".into(), "Acme".into());
        assert_eq!(space.status, SpaceStatus::Draft);
        assert!(!space.metadata.is_deleted);
    }
}
