//! Response document schema
//!
//! At most one response row exists per block (unique index + upsert).
//! The `value` payload is interpreted relative to the owning block's current
//! content: entries for tasks or questions that were since removed are
//! ignored by the readers, never deleted here.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for responses
pub const RESPONSE_COLLECTION: &str = "responses";

/// Response document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ResponseDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Owning block; one response per block
    pub block_id: String,

    /// Owning space (denormalized for one-hop space scans)
    pub space_id: String,

    /// Stored value; shape depends on the block type. Task blocks hold a
    /// task-key → status map, forms a question-id → answer map, checklists a
    /// list of checked item ids.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl IntoIndexes for ResponseDoc {
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
        ]
    }
}

impl MutMetadata for ResponseDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
