//! Staff membership schema
//!
//! Staff are platform-authenticated elsewhere; this row only proves that an
//! identity belongs to an organization. Staff handles are never elevated:
//! they remain subject to the ordinary per-row policy of the store.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for staff memberships
pub const STAFF_COLLECTION: &str = "staff";

/// Staff membership document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StaffDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Organization the staff member belongs to
    pub org_id: String,

    /// Platform identity email, lowercased
    pub email: String,

    /// Display name
    #[serde(default)]
    pub display_name: String,

    /// Org-level role label
    #[serde(default)]
    pub role: String,
}

impl IntoIndexes for StaffDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "org_id": 1, "email": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("org_staff_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for StaffDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
