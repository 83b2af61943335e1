//! Typed accessors over polymorphic block content
//!
//! Blocks store an opaque JSON payload whose shape is owned by the block
//! type tag. Everything that needs to read a payload goes through
//! [`BlockContent::parse`]: malformed or unknown content degrades to zero
//! countable items so one corrupt block can never break a whole space's
//! progress computation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Block type tags understood by the progress engine
pub mod block_types {
    pub const TASK_LIST: &str = "task_list";
    pub const ACTION_PLAN: &str = "action_plan";
    pub const FORM: &str = "form";
    pub const FILE_UPLOAD: &str = "file_upload";
    pub const FILE_DOWNLOAD: &str = "file_download";
    pub const TEXT: &str = "text";
    pub const CONTACT: &str = "contact";
    pub const EMBED: &str = "embed";
    pub const CHECKLIST: &str = "checklist";
}

/// Task completion status. Display contexts also use `in_progress`;
/// completion math only distinguishes completed vs. not.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A task inside a task list or a milestone
#[derive(Deserialize, Clone, Debug, Default)]
pub struct TaskItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Calendar date string `YYYY-MM-DD`; compared lexicographically
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Content of a plain task list block
#[derive(Deserialize, Clone, Debug, Default)]
pub struct TaskListContent {
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
}

/// A named group of tasks inside an action plan block
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Milestone {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
}

/// Content of a milestone-based action plan block
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ActionPlanContent {
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// A question inside a form block
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub question_type: String,
}

/// Content of a form block
#[derive(Deserialize, Clone, Debug, Default)]
pub struct FormContent {
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Content of a file upload block. `max_files` never affects completion:
/// the block counts as one unit, complete once at least one file is attached.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct FileUploadContent {
    #[serde(default)]
    pub max_files: Option<u32>,
}

/// An item inside a checklist block
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ChecklistItem {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Content of a checklist block. Checked state lives in the block's
/// response as a set of checked item ids; checklists contribute zero
/// countable items to progress.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ChecklistContent {
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

/// Tagged view over a block's payload
#[derive(Clone, Debug)]
pub enum BlockContent {
    TaskList(TaskListContent),
    ActionPlan(ActionPlanContent),
    Form(FormContent),
    FileUpload(FileUploadContent),
    Checklist(ChecklistContent),
    /// Display-only or future types; contributes zero countable items
    Passive,
}

impl BlockContent {
    /// Parse a payload according to its type tag. Malformed payloads yield
    /// the empty shape for the type rather than an error.
    pub fn parse(block_type: &str, content: &Value) -> Self {
        match block_type {
            block_types::TASK_LIST => {
                Self::TaskList(serde_json::from_value(content.clone()).unwrap_or_default())
            }
            block_types::ACTION_PLAN => {
                Self::ActionPlan(serde_json::from_value(content.clone()).unwrap_or_default())
            }
            block_types::FORM => {
                Self::Form(serde_json::from_value(content.clone()).unwrap_or_default())
            }
            block_types::FILE_UPLOAD => {
                Self::FileUpload(serde_json::from_value(content.clone()).unwrap_or_default())
            }
            block_types::CHECKLIST => {
                Self::Checklist(serde_json::from_value(content.clone()).unwrap_or_default())
            }
            _ => Self::Passive,
        }
    }
}

/// Read a response value as a task-key → status map. Non-string entries and
/// unknown status labels read as pending; orphaned keys are simply never
/// looked up.
pub fn task_status_map(value: &Value) -> HashMap<String, TaskStatus> {
    let mut map = HashMap::new();
    if let Value::Object(entries) = value {
        for (key, entry) in entries {
            if let Value::String(label) = entry {
                let status = match label.as_str() {
                    "completed" => TaskStatus::Completed,
                    "in_progress" => TaskStatus::InProgress,
                    _ => TaskStatus::Pending,
                };
                map.insert(key.clone(), status);
            }
        }
    }
    map
}

/// Read a checklist response value as the set of checked item ids. Accepts
/// either an array of ids or an id → bool map; anything else reads as
/// nothing checked.
pub fn checklist_checked_ids(value: &Value) -> HashSet<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Value::Object(entries) => entries
            .iter()
            .filter(|(_, v)| v.as_bool() == Some(true))
            .map(|(k, _)| k.clone())
            .collect(),
        _ => HashSet::new(),
    }
}

/// Read a response value as a question-id → answer map
pub fn form_answers(value: &Value) -> HashMap<String, Value> {
    match value {
        Value::Object(entries) => entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        _ => HashMap::new(),
    }
}

/// Whether a stored answer is meaningfully non-empty.
///
/// Rule by answer shape: free text counts if trimmed non-empty;
/// single-select if the selected value is a non-empty string; multi-select
/// if the selection array is non-empty; date answers count if a date value
/// is present. Empty shells do not count even when a response row exists.
pub fn answer_is_meaningful(answer: &Value) -> bool {
    match answer {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => {
            if let Some(inner) = fields.get("value") {
                return answer_is_meaningful(inner);
            }
            if let Some(date) = fields.get("date") {
                return !date.is_null() && answer_is_meaningful(date);
            }
            false
        }
        Value::Number(_) | Value::Bool(_) => true,
        Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_task_list() {
        let content = json!({
            "tasks": [
                { "id": "a", "title": "Kickoff call", "due_date": "2026-09-01" },
                { "id": "b", "title": "Send contract" }
            ]
        });
        match BlockContent::parse(block_types::TASK_LIST, &content) {
            BlockContent::TaskList(list) => {
                assert_eq!(list.tasks.len(), 2);
                assert_eq!(list.tasks[0].due_date.as_deref(), Some("2026-09-01"));
                assert!(list.tasks[1].due_date.is_none());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_content_degrades_to_empty() {
        let garbage = json!({ "tasks": "not-an-array" });
        match BlockContent::parse(block_types::TASK_LIST, &garbage) {
            BlockContent::TaskList(list) => assert!(list.tasks.is_empty()),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_parse_checklist_and_checked_ids() {
        let content = json!({
            "items": [
                { "id": "c1", "label": "Read the welcome guide" },
                { "id": "c2", "label": "Bookmark the portal" }
            ]
        });
        match BlockContent::parse(block_types::CHECKLIST, &content) {
            BlockContent::Checklist(list) => assert_eq!(list.items.len(), 2),
            other => panic!("unexpected variant: {other:?}"),
        }

        // checked state as an id array
        let checked = checklist_checked_ids(&json!(["c1", "c2"]));
        assert!(checked.contains("c1") && checked.contains("c2"));
        // or as an id -> bool map; only true entries count
        let checked = checklist_checked_ids(&json!({ "c1": true, "c2": false }));
        assert!(checked.contains("c1"));
        assert!(!checked.contains("c2"));
        assert!(checklist_checked_ids(&json!("garbage")).is_empty());
    }

    #[test]
    fn test_unknown_type_is_passive() {
        assert!(matches!(
            BlockContent::parse("hologram", &json!({})),
            BlockContent::Passive
        ));
        assert!(matches!(
            BlockContent::parse(block_types::TEXT, &json!({ "body": "hello" })),
            BlockContent::Passive
        ));
    }

    #[test]
    fn test_task_status_map_defaults() {
        let value = json!({
            "t1": "completed",
            "t2": "in_progress",
            "t3": "garbage",
            "t4": 42
        });
        let map = task_status_map(&value);
        assert_eq!(map.get("t1"), Some(&TaskStatus::Completed));
        assert_eq!(map.get("t2"), Some(&TaskStatus::InProgress));
        assert_eq!(map.get("t3"), Some(&TaskStatus::Pending));
        // non-string entries are ignored, which also reads as pending
        assert_eq!(map.get("t4"), None);
    }

    #[test]
    fn test_answer_meaningfulness_by_shape() {
        // free text
        assert!(answer_is_meaningful(&json!("some notes")));
        assert!(!answer_is_meaningful(&json!("   ")));
        // multi-select
        assert!(answer_is_meaningful(&json!(["a"])));
        assert!(!answer_is_meaningful(&json!([])));
        // wrapped value
        assert!(answer_is_meaningful(&json!({ "value": "yes" })));
        assert!(!answer_is_meaningful(&json!({ "value": "" })));
        // date
        assert!(answer_is_meaningful(&json!({ "date": "2026-09-01" })));
        assert!(!answer_is_meaningful(&json!({ "date": null })));
        // empty shells
        assert!(!answer_is_meaningful(&json!({})));
        assert!(!answer_is_meaningful(&Value::Null));
    }
}
