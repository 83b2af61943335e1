//! Space-wide task flattening, overdue detection, and risk
//!
//! Tasks live inside two block shapes. When surfaced outside the owning
//! block's response (upcoming/overdue lists spanning a space) each task
//! carries its externally disambiguated id from [`crate::ids`].

use serde::Serialize;

use crate::content::{block_types, BlockContent, TaskStatus, task_status_map};
use crate::db::views::SpaceView;
use crate::ids;

/// A task flattened out of its owning block
#[derive(Clone, Debug, Serialize)]
pub struct TaskRef {
    /// Externally disambiguated id: `{blockId}-{taskKey}`
    pub external_id: String,
    pub block_id: String,
    pub page_id: String,
    /// Status key inside the owning block's response
    pub task_key: String,
    pub title: String,
    /// Title of the owning milestone for action plan tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub status: TaskStatus,
}

/// Flatten every task of the space, resolving stored statuses. Tasks absent
/// from the response default to pending; orphaned response entries are never
/// visited.
pub fn collect_tasks(view: &SpaceView) -> Vec<TaskRef> {
    let mut out = Vec::new();

    for block in &view.blocks {
        if block.block_type != block_types::TASK_LIST
            && block.block_type != block_types::ACTION_PLAN
        {
            continue;
        }

        let statuses = view
            .responses
            .get(&block.block_id)
            .map(|r| task_status_map(&r.value))
            .unwrap_or_default();

        match BlockContent::parse(&block.block_type, &block.content) {
            BlockContent::TaskList(list) => {
                for task in &list.tasks {
                    let status = statuses.get(&task.id).copied().unwrap_or_default();
                    out.push(TaskRef {
                        external_id: ids::external_task_id(&block.block_id, &task.id),
                        block_id: block.block_id.clone(),
                        page_id: block.page_id.clone(),
                        task_key: task.id.clone(),
                        title: task.title.clone(),
                        milestone: None,
                        due_date: task.due_date.clone(),
                        status,
                    });
                }
            }
            BlockContent::ActionPlan(plan) => {
                for milestone in &plan.milestones {
                    for task in &milestone.tasks {
                        let key = ids::milestone_task_key(&milestone.id, &task.id);
                        let status = statuses.get(&key).copied().unwrap_or_default();
                        out.push(TaskRef {
                            external_id: ids::external_milestone_task_id(
                                &block.block_id,
                                &milestone.id,
                                &task.id,
                            ),
                            block_id: block.block_id.clone(),
                            page_id: block.page_id.clone(),
                            task_key: key,
                            title: task.title.clone(),
                            milestone: Some(milestone.title.clone()),
                            due_date: task.due_date.clone(),
                            status,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    out
}

/// A pending task is overdue when its due date, compared as a calendar-date
/// string, is strictly before today.
pub fn is_overdue(task: &TaskRef, today: &str) -> bool {
    if task.status.is_completed() {
        return false;
    }
    match &task.due_date {
        Some(due) => due.as_str() < today,
        None => false,
    }
}

/// Pending tasks with a due date of today or later, ascending by due date
pub fn list_upcoming_tasks(view: &SpaceView, today: &str) -> Vec<TaskRef> {
    let mut tasks: Vec<TaskRef> = collect_tasks(view)
        .into_iter()
        .filter(|t| !t.status.is_completed())
        .filter(|t| t.due_date.as_deref().is_some_and(|d| d >= today))
        .collect();
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    tasks
}

/// Pending tasks already past their due date, ascending by due date
pub fn list_overdue_tasks(view: &SpaceView, today: &str) -> Vec<TaskRef> {
    let mut tasks: Vec<TaskRef> = collect_tasks(view)
        .into_iter()
        .filter(|t| is_overdue(t, today))
        .collect();
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    tasks
}

/// A space is at risk when more than half of its tasks are overdue
pub fn is_at_risk(view: &SpaceView, today: &str) -> bool {
    let tasks = collect_tasks(view);
    if tasks.is_empty() {
        return false;
    }
    let overdue = tasks.iter().filter(|t| is_overdue(t, today)).count();
    overdue * 2 > tasks.len()
}
