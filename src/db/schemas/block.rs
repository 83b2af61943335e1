//! Block document schema
//!
//! A polymorphic content unit. The `block_type` tag determines the shape of
//! the opaque `content` payload; the typed accessors live in
//! [`crate::content`], and nothing here validates content beyond storage.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for blocks
pub const BLOCK_COLLECTION: &str = "blocks";

/// Block document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct BlockDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Canonical block id token
    pub block_id: String,

    /// Owning page
    pub page_id: String,

    /// Owning space (denormalized for one-hop space scans)
    pub space_id: String,

    /// Type tag, e.g. `task_list`, `action_plan`, `form`, `file_upload`
    pub block_type: String,

    /// Sort position within the page
    #[serde(default)]
    pub position: i32,

    /// Opaque payload; shape is entirely determined by `block_type`
    #[serde(default)]
    pub content: serde_json::Value,
}

impl IntoIndexes for BlockDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "block_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("block_id_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "space_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("space_id_index".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "page_id": 1, "position": 1 },
                Some(
                    IndexOptions::builder()
                        .name("page_position_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for BlockDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
