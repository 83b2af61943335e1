//! File document schema
//!
//! An uploaded artifact attached to a block. Physical storage and signed
//! download URLs belong to the storage collaborator; this core records the
//! validated storage path and the upload metadata only.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for files
pub const FILE_COLLECTION: &str = "files";

/// File document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FileDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Canonical file id token
    pub file_id: String,

    /// Block the file is attached to
    pub block_id: String,

    /// Owning space (denormalized for one-hop space scans)
    pub space_id: String,

    /// Original filename as uploaded
    pub original_name: String,

    /// Size in bytes
    #[serde(default)]
    pub size: i64,

    /// MIME type
    #[serde(default)]
    pub mime_type: String,

    /// Validated storage reference; the storage collaborator signs
    /// time-limited download URLs keyed by this path
    pub storage_path: String,

    /// Email of the uploading actor
    #[serde(default)]
    pub uploaded_by: String,
}

impl IntoIndexes for FileDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "file_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("file_id_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "block_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("block_id_index".to_string())
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

impl MutMetadata for FileDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
