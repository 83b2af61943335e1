//! Progress engine
//!
//! Walks a space's pages, blocks, responses, and files and reduces them to a
//! single stable notion of percent complete, plus overdue and at-risk
//! signals. Three item categories count: tasks (both block shapes), form
//! questions (meaningfully answered or not), and file-upload blocks (one
//! unit each). Everything here is pure over a [`SpaceView`]; the service at
//! the bottom recomputes on every call and never caches.

pub mod tasks;

use chrono::Utc;
use serde::Serialize;

use crate::content::{answer_is_meaningful, form_answers, task_status_map, BlockContent};
use crate::db::schemas::{BlockDoc, FileDoc, ResponseDoc};
use crate::db::views::SpaceView;
use crate::db::{MongoClient, ViewLoader};
use crate::ids;
use crate::types::Result;

pub use tasks::{collect_tasks, is_at_risk, is_overdue, list_overdue_tasks, list_upcoming_tasks, TaskRef};

/// Today as the calendar-date string all due-date comparisons use
pub fn today_string() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Space-level completion metrics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SpaceProgress {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub total_forms: u32,
    pub answered_forms: u32,
    pub total_files: u32,
    pub uploaded_files: u32,
    pub progress_percentage: u32,
}

/// Per-page completion metrics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageProgress {
    pub page_id: String,
    pub total_items: u32,
    pub completed_items: u32,
    pub progress_percentage: u32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Counts {
    task_total: u32,
    task_done: u32,
    form_total: u32,
    form_done: u32,
    file_total: u32,
    file_done: u32,
}

impl Counts {
    fn add(&mut self, other: Counts) {
        self.task_total += other.task_total;
        self.task_done += other.task_done;
        self.form_total += other.form_total;
        self.form_done += other.form_done;
        self.file_total += other.file_total;
        self.file_done += other.file_done;
    }

    fn items(&self) -> (u32, u32) {
        (
            self.task_total + self.form_total + self.file_total,
            self.task_done + self.form_done + self.file_done,
        )
    }
}

fn percent(done: u32, total: u32, when_empty: u32) -> u32 {
    if total == 0 {
        when_empty
    } else {
        (100.0 * f64::from(done) / f64::from(total)).round() as u32
    }
}

/// Count one block's items. Unknown types and malformed content contribute
/// zero items.
fn count_block(block: &BlockDoc, response: Option<&ResponseDoc>, files: &[FileDoc]) -> Counts {
    let mut counts = Counts::default();

    match BlockContent::parse(&block.block_type, &block.content) {
        BlockContent::TaskList(list) => {
            let statuses = response
                .map(|r| task_status_map(&r.value))
                .unwrap_or_default();
            for task in &list.tasks {
                counts.task_total += 1;
                if statuses
                    .get(&task.id)
                    .copied()
                    .unwrap_or_default()
                    .is_completed()
                {
                    counts.task_done += 1;
                }
            }
        }
        BlockContent::ActionPlan(plan) => {
            let statuses = response
                .map(|r| task_status_map(&r.value))
                .unwrap_or_default();
            for milestone in &plan.milestones {
                for task in &milestone.tasks {
                    counts.task_total += 1;
                    let key = ids::milestone_task_key(&milestone.id, &task.id);
                    if statuses.get(&key).copied().unwrap_or_default().is_completed() {
                        counts.task_done += 1;
                    }
                }
            }
        }
        BlockContent::Form(form) => {
            let answers = response.map(|r| form_answers(&r.value)).unwrap_or_default();
            for question in &form.questions {
                counts.form_total += 1;
                if answers
                    .get(&question.id)
                    .is_some_and(answer_is_meaningful)
                {
                    counts.form_done += 1;
                }
            }
        }
        BlockContent::FileUpload(_) => {
            // one unit per block, complete with at least one live file
            counts.file_total += 1;
            if !files.is_empty() {
                counts.file_done += 1;
            }
        }
        BlockContent::Checklist(_) | BlockContent::Passive => {}
    }

    counts
}

fn count_view(view: &SpaceView, page_id: Option<&str>) -> Counts {
    let mut totals = Counts::default();
    for block in &view.blocks {
        if page_id.is_some_and(|p| p != block.page_id) {
            continue;
        }
        let response = view.responses.get(&block.block_id);
        let files = view
            .files
            .get(&block.block_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        totals.add(count_block(block, response, files));
    }
    totals
}

/// Space-level aggregate; a space with no countable items reads 0%.
pub fn compute_space_progress(view: &SpaceView) -> SpaceProgress {
    let counts = count_view(view, None);
    let (total, done) = counts.items();
    SpaceProgress {
        total_tasks: counts.task_total,
        completed_tasks: counts.task_done,
        total_forms: counts.form_total,
        answered_forms: counts.form_done,
        total_files: counts.file_total,
        uploaded_files: counts.file_done,
        progress_percentage: percent(done, total, 0),
    }
}

/// Per-page aggregates. A page with no countable items reads 100%: nothing
/// actionable means done. This deliberately differs from the space-level 0%
/// default; both are exercised by existing callers.
pub fn compute_progress_per_page(view: &SpaceView) -> Vec<PageProgress> {
    view.pages
        .iter()
        .map(|page| {
            let counts = count_view(view, Some(&page.page_id));
            let (total, done) = counts.items();
            PageProgress {
                page_id: page.page_id.clone(),
                total_items: total,
                completed_items: done,
                progress_percentage: percent(done, total, 100),
            }
        })
        .collect()
}

/// Async entry points over live data
#[derive(Clone)]
pub struct ProgressService {
    loader: ViewLoader,
}

impl ProgressService {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            loader: ViewLoader::new(client).await?,
        })
    }

    pub async fn compute_space_progress(&self, space_id: &str) -> Result<SpaceProgress> {
        let view = self.loader.load_space_view(space_id).await?;
        Ok(compute_space_progress(&view))
    }

    pub async fn compute_progress_per_page(&self, space_id: &str) -> Result<Vec<PageProgress>> {
        let view = self.loader.load_space_view(space_id).await?;
        Ok(compute_progress_per_page(&view))
    }

    pub async fn list_upcoming_tasks(&self, space_id: &str) -> Result<Vec<TaskRef>> {
        let view = self.loader.load_space_view(space_id).await?;
        Ok(list_upcoming_tasks(&view, &today_string()))
    }

    pub async fn list_overdue_tasks(&self, space_id: &str) -> Result<Vec<TaskRef>> {
        let view = self.loader.load_space_view(space_id).await?;
        Ok(list_overdue_tasks(&view, &today_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;
    use crate::content::block_types;
    use crate::db::schemas::SpaceStatus;
    use serde_json::json;

    #[test]
    fn test_mixed_space_accounting() {
        let view = sample_space_view();
        let progress = compute_space_progress(&view);
        assert_eq!(progress.total_tasks, 4);
        assert_eq!(progress.completed_tasks, 2);
        assert_eq!(progress.total_forms, 1);
        assert_eq!(progress.answered_forms, 0);
        assert_eq!(progress.total_files, 1);
        assert_eq!(progress.uploaded_files, 0);
        // round(100 * 2 / 6)
        assert_eq!(progress.progress_percentage, 33);
    }

    #[test]
    fn test_spec_scenario_twenty_five_percent() {
        // one plain-task block (2 tasks, one completed), one form block
        // (1 question, unanswered), one upload block (no files)
        let sid = "space-s";
        let pid = "page-s";
        let view = assemble(
            make_space(sid, SpaceStatus::Active),
            vec![make_page(sid, pid)],
            vec![
                make_block(
                    sid,
                    pid,
                    "b1",
                    block_types::TASK_LIST,
                    json!({ "tasks": [ { "id": "t1" }, { "id": "t2" } ] }),
                ),
                make_block(
                    sid,
                    pid,
                    "b2",
                    block_types::FORM,
                    json!({ "questions": [ { "id": "q1" } ] }),
                ),
                make_block(sid, pid, "b3", block_types::FILE_UPLOAD, json!({})),
            ],
            vec![make_response(sid, "b1", json!({ "t1": "completed" }))],
            vec![],
        );

        let progress = compute_space_progress(&view);
        assert_eq!(progress.total_tasks, 2);
        assert_eq!(progress.completed_tasks, 1);
        assert_eq!(progress.total_forms, 1);
        assert_eq!(progress.answered_forms, 0);
        assert_eq!(progress.total_files, 1);
        assert_eq!(progress.uploaded_files, 0);
        assert_eq!(progress.progress_percentage, 25);
    }

    #[test]
    fn test_empty_space_is_zero_percent() {
        let progress = compute_space_progress(&empty_space_view());
        assert_eq!(progress.progress_percentage, 0);
        assert_eq!(progress.total_tasks, 0);
    }

    #[test]
    fn test_empty_page_is_hundred_percent() {
        // intentional asymmetry from the space-level 0% default
        let sid = "space-p";
        let view = assemble(
            make_space(sid, SpaceStatus::Active),
            vec![
                make_page(sid, "p1"),
                make_page(sid, "p2"),
            ],
            vec![make_block(
                sid,
                "p1",
                "b1",
                block_types::TASK_LIST,
                json!({ "tasks": [ { "id": "t1" } ] }),
            )],
            vec![],
            vec![],
        );

        let pages = compute_progress_per_page(&view);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_id, "p1");
        assert_eq!(pages[0].progress_percentage, 0);
        assert_eq!(pages[1].page_id, "p2");
        assert_eq!(pages[1].total_items, 0);
        assert_eq!(pages[1].progress_percentage, 100);
    }

    #[test]
    fn test_toggle_moves_completed_by_exactly_one() {
        let mut view = sample_space_view();
        let before = compute_space_progress(&view);

        // complete t2 in the plain-task block
        view.responses.get_mut("block-tasks").unwrap().value = json!({
            "t1": "completed",
            "t2": "completed",
        });
        let after = compute_space_progress(&view);
        assert_eq!(after.completed_tasks, before.completed_tasks + 1);
        assert_eq!(after.total_tasks, before.total_tasks);

        // reopen it again
        view.responses.get_mut("block-tasks").unwrap().value = json!({ "t1": "completed" });
        let back = compute_space_progress(&view);
        assert_eq!(back, before);
    }

    #[test]
    fn test_upload_block_completes_with_one_file() {
        let mut view = sample_space_view();
        view.files
            .entry("block-upload".into())
            .or_default()
            .push(make_file("space-1", "block-upload", "f1"));
        let progress = compute_space_progress(&view);
        assert_eq!(progress.uploaded_files, 1);
        // still one unit even with more files
        view.files
            .get_mut("block-upload")
            .unwrap()
            .push(make_file("space-1", "block-upload", "f2"));
        let again = compute_space_progress(&view);
        assert_eq!(again.total_files, 1);
        assert_eq!(again.uploaded_files, 1);
    }

    #[test]
    fn test_meaningful_answers_count() {
        let mut view = sample_space_view();
        // empty-shell answer does not count
        view.responses.insert(
            "block-form".into(),
            make_response("space-1", "block-form", json!({ "q1": "   " })),
        );
        assert_eq!(compute_space_progress(&view).answered_forms, 0);

        view.responses.insert(
            "block-form".into(),
            make_response("space-1", "block-form", json!({ "q1": "Jane Doe" })),
        );
        assert_eq!(compute_space_progress(&view).answered_forms, 1);
    }

    #[test]
    fn test_orphaned_response_entries_are_ignored() {
        let mut view = sample_space_view();
        // status for a task no longer present in the block content
        view.responses.get_mut("block-tasks").unwrap().value = json!({
            "t1": "completed",
            "ghost": "completed",
        });
        let progress = compute_space_progress(&view);
        assert_eq!(progress.total_tasks, 4);
        assert_eq!(progress.completed_tasks, 2);
    }

    #[test]
    fn test_checklist_blocks_contribute_zero_items() {
        let mut view = sample_space_view();
        view.blocks.push(make_block(
            "space-1",
            "page-1",
            "block-checklist",
            block_types::CHECKLIST,
            json!({ "items": [ { "id": "c1", "label": "Orientation" } ] }),
        ));
        let progress = compute_space_progress(&view);
        assert_eq!(progress.total_tasks, 4);
        assert_eq!(progress.total_forms, 1);
        assert_eq!(progress.total_files, 1);
    }

    #[test]
    fn test_corrupt_block_cannot_break_the_aggregate() {
        let mut view = sample_space_view();
        view.blocks.push(make_block(
            "space-1",
            "page-1",
            "block-bad",
            block_types::TASK_LIST,
            json!("total garbage"),
        ));
        let progress = compute_space_progress(&view);
        assert_eq!(progress.total_tasks, 4);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let view = sample_space_view();
        assert_eq!(compute_space_progress(&view), compute_space_progress(&view));
        assert_eq!(
            compute_progress_per_page(&view),
            compute_progress_per_page(&view)
        );
    }
}
