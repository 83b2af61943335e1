//! Mutating entry points
//!
//! Every mutation takes an already-resolved [`ScopedHandle`], re-checks the
//! space's lifecycle gate immediately before touching data (status can
//! change between page load and action), performs the write, then appends
//! an activity entry best-effort. Concurrent writers to the same block race
//! by design: the response upsert is last-writer-wins.

use bson::{doc, DateTime};
use serde_json::json;

use crate::activity::ActivityLogger;
use crate::auth::{AccessGate, ScopedHandle};
use crate::content::{BlockContent, TaskStatus};
use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{
    actions, BlockDoc, FileDoc, Metadata, ResponseDoc, SpaceDoc, SpaceStatus, BLOCK_COLLECTION,
    FILE_COLLECTION, RESPONSE_COLLECTION, SPACE_COLLECTION,
};
use crate::ids;
use crate::types::{GangwayError, Result};

/// Validate a storage reference before recording it: relative, no parent
/// traversal, forward slashes only.
pub fn validate_storage_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(GangwayError::BadRequest("storage path is empty".into()));
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(GangwayError::BadRequest(
            "storage path must be relative".into(),
        ));
    }
    if path.split('/').any(|part| part == "..") {
        return Err(GangwayError::BadRequest(
            "storage path may not traverse upward".into(),
        ));
    }
    Ok(())
}

/// Whether a status key addresses a task in the block's *current* content.
/// Keys for since-removed tasks validate false; their stale response
/// entries are ignored, never deleted.
pub fn task_key_in_block(block: &BlockDoc, task_key: &str) -> bool {
    match BlockContent::parse(&block.block_type, &block.content) {
        BlockContent::TaskList(list) => list.tasks.iter().any(|t| t.id == task_key),
        BlockContent::ActionPlan(plan) => plan.milestones.iter().any(|m| {
            m.tasks
                .iter()
                .any(|t| ids::milestone_task_key(&m.id, &t.id) == task_key)
        }),
        _ => false,
    }
}

/// Mutation service composing the gate, the store, and the activity log
#[derive(Clone)]
pub struct ActionService {
    gate: AccessGate,
    activity: ActivityLogger,
    spaces: MongoCollection<SpaceDoc>,
    blocks: MongoCollection<BlockDoc>,
    responses: MongoCollection<ResponseDoc>,
    files: MongoCollection<FileDoc>,
}

impl ActionService {
    pub async fn new(
        client: &MongoClient,
        gate: AccessGate,
        activity: ActivityLogger,
    ) -> Result<Self> {
        Ok(Self {
            gate,
            activity,
            spaces: client.collection(SPACE_COLLECTION).await?,
            blocks: client.collection(BLOCK_COLLECTION).await?,
            responses: client.collection(RESPONSE_COLLECTION).await?,
            files: client.collection(FILE_COLLECTION).await?,
        })
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn activity(&self) -> &ActivityLogger {
        &self.activity
    }

    async fn ensure_writable(&self, space_id: &str) -> Result<()> {
        let (_space, accessibility) = self.gate.check_space(space_id).await?;
        accessibility.ensure_writable()
    }

    async fn load_block(&self, space_id: &str, block_id: &str) -> Result<BlockDoc> {
        self.blocks
            .find_one(doc! { "block_id": block_id, "space_id": space_id })
            .await?
            .ok_or_else(|| GangwayError::NotFound(format!("block {block_id}")))
    }

    /// Toggle one task's status inside its block's response row
    pub async fn toggle_task(
        &self,
        handle: &ScopedHandle,
        space_id: &str,
        block_id: &str,
        task_key: &str,
        status: TaskStatus,
    ) -> Result<()> {
        self.ensure_writable(space_id).await?;

        let block = self.load_block(space_id, block_id).await?;
        if !task_key_in_block(&block, task_key) {
            return Err(GangwayError::BadRequest(format!(
                "task '{task_key}' does not exist in this block"
            )));
        }

        let now = DateTime::now();
        self.responses
            .upsert_one(
                doc! { "block_id": block_id },
                doc! {
                    "$set": {
                        format!("value.{}", task_key): status.as_str(),
                        "metadata.updated_at": now,
                        "metadata.is_deleted": false,
                    },
                    "$setOnInsert": {
                        "block_id": block_id,
                        "space_id": space_id,
                        "metadata.created_at": now,
                    },
                },
            )
            .await?;

        let action = if status.is_completed() {
            actions::TASK_COMPLETED
        } else {
            actions::TASK_REOPENED
        };
        self.activity
            .log_best_effort(
                space_id,
                handle.actor_email(),
                action,
                Some(("block", block_id)),
                json!({ "task": task_key, "status": status.as_str() }),
            )
            .await;

        Ok(())
    }

    /// Save a block's whole response value (forms, checklists). One row per
    /// block; concurrent saves resolve last-writer-wins.
    pub async fn save_response(
        &self,
        handle: &ScopedHandle,
        space_id: &str,
        block_id: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        self.ensure_writable(space_id).await?;
        self.load_block(space_id, block_id).await?;

        let now = DateTime::now();
        self.responses
            .upsert_one(
                doc! { "block_id": block_id },
                doc! {
                    "$set": {
                        "value": bson::to_bson(&value)?,
                        "metadata.updated_at": now,
                        "metadata.is_deleted": false,
                    },
                    "$setOnInsert": {
                        "block_id": block_id,
                        "space_id": space_id,
                        "metadata.created_at": now,
                    },
                },
            )
            .await?;

        self.activity
            .log_best_effort(
                space_id,
                handle.actor_email(),
                actions::RESPONSE_SAVED,
                Some(("block", block_id)),
                serde_json::Value::Null,
            )
            .await;

        Ok(())
    }

    /// Record an accepted upload against a block. Physical storage already
    /// happened at the storage collaborator; only the reference lands here.
    pub async fn upload_file_record(
        &self,
        handle: &ScopedHandle,
        space_id: &str,
        block_id: &str,
        original_name: &str,
        size: i64,
        mime_type: &str,
        storage_path: &str,
    ) -> Result<String> {
        self.ensure_writable(space_id).await?;
        self.load_block(space_id, block_id).await?;
        validate_storage_path(storage_path)?;

        let file_id = ids::new_id();
        let file = FileDoc {
            _id: None,
            metadata: Metadata::new(),
            file_id: file_id.clone(),
            block_id: block_id.to_string(),
            space_id: space_id.to_string(),
            original_name: original_name.to_string(),
            size,
            mime_type: mime_type.to_string(),
            storage_path: storage_path.to_string(),
            uploaded_by: handle.actor_email().to_string(),
        };
        self.files.insert_one(file).await?;

        self.activity
            .log_best_effort(
                space_id,
                handle.actor_email(),
                actions::FILE_UPLOADED,
                Some(("file", &file_id)),
                json!({ "name": original_name, "size": size }),
            )
            .await;

        Ok(file_id)
    }

    /// Soft-delete an uploaded file record
    pub async fn delete_file_record(
        &self,
        handle: &ScopedHandle,
        space_id: &str,
        file_id: &str,
    ) -> Result<()> {
        self.ensure_writable(space_id).await?;

        let file = self
            .files
            .find_one(doc! { "file_id": file_id, "space_id": space_id })
            .await?
            .ok_or_else(|| GangwayError::NotFound(format!("file {file_id}")))?;

        self.files
            .soft_delete(doc! { "file_id": file_id })
            .await?;

        self.activity
            .log_best_effort(
                space_id,
                handle.actor_email(),
                actions::FILE_DELETED,
                Some(("file", file_id)),
                json!({ "name": file.original_name }),
            )
            .await;

        Ok(())
    }

    /// Staff-only lifecycle transition. The logged `{from, to}` metadata is
    /// the only record the completion-duration KPI can reconstruct from.
    pub async fn change_space_status(
        &self,
        handle: &ScopedHandle,
        space_id: &str,
        new_status: SpaceStatus,
    ) -> Result<()> {
        if !handle.is_staff() {
            return Err(GangwayError::Forbidden(
                "status transitions are staff-only".into(),
            ));
        }

        let space = self
            .spaces
            .find_one(doc! { "space_id": space_id })
            .await?
            .ok_or_else(|| GangwayError::NotFound(format!("space {space_id}")))?;

        if space.status == new_status {
            return Ok(());
        }

        self.spaces
            .update_one(
                doc! { "space_id": space_id },
                doc! { "$set": {
                    "status": new_status.as_str(),
                    "metadata.updated_at": DateTime::now(),
                }},
            )
            .await?;

        self.activity
            .log_best_effort(
                space_id,
                handle.actor_email(),
                actions::STATUS_CHANGED,
                None,
                json!({ "from": space.status.as_str(), "to": new_status.as_str() }),
            )
            .await;

        Ok(())
    }

    /// Staff-only archival; `delete` additionally soft-deletes the space,
    /// removing it from every listing and aggregate. Never hard-deletes.
    pub async fn archive_space(
        &self,
        handle: &ScopedHandle,
        space_id: &str,
        delete: bool,
    ) -> Result<()> {
        self.change_space_status(handle, space_id, SpaceStatus::Archived)
            .await?;

        if delete {
            self.spaces
                .soft_delete(doc! { "space_id": space_id })
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storage_path_validation() {
        assert!(validate_storage_path("uploads/space-1/report.pdf").is_ok());
        assert!(validate_storage_path("").is_err());
        assert!(validate_storage_path("   ").is_err());
        assert!(validate_storage_path("/etc/passwd").is_err());
        assert!(validate_storage_path("uploads/../secrets").is_err());
        assert!(validate_storage_path("uploads\\windows\\style").is_err());
        // dots inside a component are fine
        assert!(validate_storage_path("uploads/v1..2/file").is_ok());
    }

    #[test]
    fn test_task_key_validation_plain() {
        let block = BlockDoc {
            block_type: "task_list".into(),
            content: json!({ "tasks": [ { "id": "t1" }, { "id": "t2" } ] }),
            ..Default::default()
        };
        assert!(task_key_in_block(&block, "t1"));
        assert!(!task_key_in_block(&block, "ghost"));
    }

    #[test]
    fn test_task_key_validation_milestone() {
        let block = BlockDoc {
            block_type: "action_plan".into(),
            content: json!({ "milestones": [
                { "id": "m1", "tasks": [ { "id": "t1" } ] },
            ]}),
            ..Default::default()
        };
        assert!(task_key_in_block(&block, "m1-t1"));
        // a bare task id is not addressable without its milestone
        assert!(!task_key_in_block(&block, "t1"));
        assert!(!task_key_in_block(&block, "m2-t1"));
    }

    #[test]
    fn test_task_key_validation_passive_block() {
        let block = BlockDoc {
            block_type: "text".into(),
            content: json!({ "body": "welcome" }),
            ..Default::default()
        };
        assert!(!task_key_in_block(&block, "anything"));
    }
}
