//! Stakeholder membership schema
//!
//! An externally invited stakeholder has no platform account; the membership
//! row keyed by `(space_id, invited_email)` is the single source of truth
//! for whether their session artifact still grants access. Deleting the row
//! revokes access immediately, even against an unexpired session.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for stakeholder memberships
pub const MEMBER_COLLECTION: &str = "members";

/// Stakeholder membership document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MemberDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Space the invite is scoped to
    pub space_id: String,

    /// Invited email, lowercased; identity plane for the stakeholder session
    pub invited_email: String,

    /// When the invite was issued; drives the time-to-first-access KPI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_at: Option<DateTime>,

    /// Display role shown in the portal (no authorization meaning)
    #[serde(default)]
    pub role: String,
}

impl MemberDoc {
    /// Create a new invite for a space
    pub fn new(space_id: String, invited_email: String, role: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            space_id,
            invited_email: invited_email.to_lowercase(),
            invited_at: Some(DateTime::now()),
            role,
        }
    }
}

impl IntoIndexes for MemberDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "space_id": 1, "invited_email": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("space_member_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for MemberDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
