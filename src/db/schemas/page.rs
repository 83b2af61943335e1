//! Page document schema
//!
//! An ordered, soft-deletable container of blocks within a space.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for pages
pub const PAGE_COLLECTION: &str = "pages";

/// Page document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PageDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Canonical page id token
    pub page_id: String,

    /// Owning space
    pub space_id: String,

    /// Human title
    pub title: String,

    /// URL-safe slug, unique within the space (enforced by the authoring
    /// collaborator; only stored here)
    pub slug: String,

    /// Sort position within the space
    #[serde(default)]
    pub position: i32,

    /// Whether invited stakeholders may see this page
    #[serde(default = "default_true")]
    pub visible_to_members: bool,
}

fn default_true() -> bool {
    true
}

impl IntoIndexes for PageDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "page_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("page_id_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "space_id": 1, "position": 1 },
                Some(
                    IndexOptions::builder()
                        .name("space_position_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for PageDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
