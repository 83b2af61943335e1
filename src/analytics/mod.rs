//! Cross-space analytics mined from the content model and the activity log
//!
//! Pure read-side aggregation over an [`OrgView`]: no new state, only new
//! groupings and windowing over entities that already exist. State
//! transition timestamps come exclusively from `project.status_changed`
//! activity entries; there is no separate transition table to consult.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::views::{OrgView, SpaceView};
use crate::db::{MongoClient, ViewLoader};
use crate::db::schemas::{MemberDoc, SpaceStatus};
use crate::progress::{
    self, compute_space_progress, is_at_risk, list_overdue_tasks, list_upcoming_tasks, TaskRef,
};
use crate::types::Result;

/// Space counts by lifecycle status
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    pub draft: u32,
    pub active: u32,
    pub completed: u32,
    pub archived: u32,
}

impl StatusDistribution {
    fn record(&mut self, status: SpaceStatus) {
        match status {
            SpaceStatus::Draft => self.draft += 1,
            SpaceStatus::Active => self.active += 1,
            SpaceStatus::Completed => self.completed += 1,
            SpaceStatus::Archived => self.archived += 1,
        }
    }
}

/// Org-level space rollup
#[derive(Clone, Debug, Default, Serialize)]
pub struct SpaceStats {
    pub total_spaces: u32,
    pub by_status: StatusDistribution,
    /// Mean of per-space progress percentages, rounded
    pub average_progress: u32,
    /// Active spaces whose tasks are more than 50% overdue
    pub at_risk: u32,
}

/// One space in a ranked list
#[derive(Clone, Debug, Serialize)]
pub struct SpaceSummary {
    pub space_id: String,
    pub name: String,
    pub client_name: String,
    pub status: SpaceStatus,
    pub progress_percentage: u32,
    pub overdue_tasks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_level: Option<String>,
}

/// A task surfaced outside its space
#[derive(Clone, Debug, Serialize)]
pub struct OrgTaskRef {
    pub space_id: String,
    pub space_name: String,
    #[serde(flatten)]
    pub task: TaskRef,
}

/// Dashboard payload: rollup + org-wide task lists + attention ranking
#[derive(Clone, Debug, Serialize)]
pub struct DashboardStats {
    pub stats: SpaceStats,
    /// Pending tasks across active spaces due within the next 30 days
    pub upcoming_tasks: Vec<OrgTaskRef>,
    /// Pending tasks across active spaces already past due
    pub overdue_tasks: Vec<OrgTaskRef>,
    /// Top five spaces needing attention: any overdue task or progress
    /// below 30%, ranked by overdue count, then ascending progress
    pub needs_attention: Vec<SpaceSummary>,
}

/// Creation count for one calendar month
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: u32,
}

/// One funnel stage
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunnelStage {
    pub stage: String,
    pub count: u32,
}

/// Distribution of invite-to-first-visit delays
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccessDistribution {
    pub same_day: u32,
    pub one_to_three_days: u32,
    pub four_to_seven_days: u32,
    pub over_seven_days: u32,
    pub not_accessed: u32,
}

impl AccessDistribution {
    fn record(&mut self, days: Option<i64>) {
        match days {
            None => self.not_accessed += 1,
            Some(0) => self.same_day += 1,
            Some(1..=3) => self.one_to_three_days += 1,
            Some(4..=7) => self.four_to_seven_days += 1,
            Some(_) => self.over_seven_days += 1,
        }
    }
}

/// Engagement level bucket (levels are written by the external scoring job)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EngagementBucket {
    pub level: String,
    pub count: u32,
}

/// An active space going live within the next 30 days
#[derive(Clone, Debug, Serialize)]
pub struct GoLive {
    pub space_id: String,
    pub name: String,
    pub client_name: String,
    pub target_date: String,
    pub progress_percentage: u32,
}

/// Insights payload: KPIs, windows, distributions, funnel
#[derive(Clone, Debug, Serialize)]
pub struct InsightsData {
    /// Mean days from "became active" to "became completed" over completed
    /// spaces, rounded; `None` when no space qualifies
    pub avg_completion_days: Option<i64>,
    /// Mean days from invite to first portal visit, one decimal; `None`
    /// when no invited member ever visited
    pub avg_days_to_first_access: Option<f64>,
    pub access_distribution: AccessDistribution,
    /// Trailing 12 calendar months including the current one, oldest first
    pub monthly_created: Vec<MonthlyCount>,
    pub status_distribution: StatusDistribution,
    pub engagement_distribution: Vec<EngagementBucket>,
    pub funnel: Vec<FunnelStage>,
    pub upcoming_go_lives: Vec<GoLive>,
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Org-level rollup
pub fn space_stats(org: &OrgView, today: &str) -> SpaceStats {
    let mut stats = SpaceStats {
        total_spaces: org.spaces.len() as u32,
        ..Default::default()
    };

    let mut progress_sum: u64 = 0;
    for view in &org.spaces {
        stats.by_status.record(view.space.status);
        progress_sum += u64::from(compute_space_progress(view).progress_percentage);
        if view.space.status == SpaceStatus::Active && is_at_risk(view, today) {
            stats.at_risk += 1;
        }
    }

    if !org.spaces.is_empty() {
        stats.average_progress =
            (progress_sum as f64 / org.spaces.len() as f64).round() as u32;
    }

    stats
}

fn summarize(view: &SpaceView, today: &str) -> SpaceSummary {
    let progress = compute_space_progress(view);
    SpaceSummary {
        space_id: view.space.space_id.clone(),
        name: view.space.name.clone(),
        client_name: view.space.client_name.clone(),
        status: view.space.status,
        progress_percentage: progress.progress_percentage,
        overdue_tasks: list_overdue_tasks(view, today).len() as u32,
        target_date: view.space.target_date.clone(),
        engagement_level: view.space.engagement_level.clone(),
    }
}

/// Dashboard rollup for one org
pub fn dashboard_stats(org: &OrgView, today: NaiveDate) -> DashboardStats {
    let today_str = iso(today);
    let horizon = iso(today + Days::new(30));

    let mut upcoming = Vec::new();
    let mut overdue = Vec::new();
    let mut candidates = Vec::new();

    for view in &org.spaces {
        if view.space.status != SpaceStatus::Active {
            continue;
        }

        for task in list_upcoming_tasks(view, &today_str) {
            if task.due_date.as_deref().is_some_and(|d| d <= horizon.as_str()) {
                upcoming.push(OrgTaskRef {
                    space_id: view.space.space_id.clone(),
                    space_name: view.space.name.clone(),
                    task,
                });
            }
        }
        for task in list_overdue_tasks(view, &today_str) {
            overdue.push(OrgTaskRef {
                space_id: view.space.space_id.clone(),
                space_name: view.space.name.clone(),
                task,
            });
        }

        let summary = summarize(view, &today_str);
        if summary.overdue_tasks > 0 || summary.progress_percentage < 30 {
            candidates.push(summary);
        }
    }

    upcoming.sort_by(|a, b| a.task.due_date.cmp(&b.task.due_date));
    overdue.sort_by(|a, b| a.task.due_date.cmp(&b.task.due_date));

    candidates.sort_by(|a, b| {
        b.overdue_tasks
            .cmp(&a.overdue_tasks)
            .then(a.progress_percentage.cmp(&b.progress_percentage))
    });
    candidates.truncate(5);

    DashboardStats {
        stats: space_stats(org, &today_str),
        upcoming_tasks: upcoming,
        overdue_tasks: overdue,
        needs_attention: candidates,
    }
}

/// Days from "became active" to "became completed" reconstructed from the
/// space's activity entries (already ascending). `None` unless both
/// transitions exist in order.
fn completion_duration_days(org: &OrgView, space_id: &str) -> Option<i64> {
    let mut became_active: Option<DateTime<Utc>> = None;
    let mut became_completed: Option<DateTime<Utc>> = None;

    for entry in org.activity.iter().filter(|a| a.space_id == space_id) {
        match entry.status_changed_to() {
            Some("active") if became_active.is_none() => {
                became_active = Some(entry.occurred_at.to_chrono());
            }
            Some("completed") if became_completed.is_none() => {
                became_completed = Some(entry.occurred_at.to_chrono());
            }
            _ => {}
        }
    }

    let (active, completed) = (became_active?, became_completed?);
    if completed < active {
        return None;
    }
    Some((completed - active).num_days())
}

/// Invite-to-first-visit delay in days, clamped to non-negative. `None` when
/// the member never visited or the invite has no timestamp.
fn days_to_first_access(org: &OrgView, member: &MemberDoc) -> Option<i64> {
    let invited_at = member.invited_at?.to_chrono();

    // activity is ascending; the first match is the earliest visit
    let first_visit = org
        .activity
        .iter()
        .find(|a| {
            a.space_id == member.space_id
                && a.actor_email == member.invited_email
                && a.is_portal_visit()
        })?
        .occurred_at
        .to_chrono();

    Some(
        (first_visit.date_naive() - invited_at.date_naive())
            .num_days()
            .max(0),
    )
}

/// Insights payload for one org
pub fn insights(org: &OrgView, today: NaiveDate) -> InsightsData {
    let today_str = iso(today);

    // completion-duration KPI over completed spaces
    let completion_samples: Vec<i64> = org
        .spaces
        .iter()
        .filter(|v| v.space.status == SpaceStatus::Completed)
        .filter_map(|v| completion_duration_days(org, &v.space.space_id))
        .collect();
    let avg_completion_days = if completion_samples.is_empty() {
        None
    } else {
        let sum: i64 = completion_samples.iter().sum();
        Some((sum as f64 / completion_samples.len() as f64).round() as i64)
    };

    // time-to-first-access KPI and distribution over invited members
    let mut access_distribution = AccessDistribution::default();
    let mut access_samples: Vec<i64> = Vec::new();
    for member in &org.members {
        if member.invited_at.is_none() {
            continue;
        }
        let days = days_to_first_access(org, member);
        access_distribution.record(days);
        if let Some(d) = days {
            access_samples.push(d);
        }
    }
    let avg_days_to_first_access = if access_samples.is_empty() {
        None
    } else {
        let sum: i64 = access_samples.iter().sum();
        Some(((sum as f64 / access_samples.len() as f64) * 10.0).round() / 10.0)
    };

    // trailing 12 calendar months, oldest first
    let current_month = today.with_day(1).unwrap_or(today);
    let mut month_counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut month_labels = Vec::with_capacity(12);
    for back in (0..12).rev() {
        let month = current_month - Months::new(back);
        let label = month.format("%Y-%m").to_string();
        month_counts.insert(label.clone(), 0);
        month_labels.push(label);
    }
    for view in &org.spaces {
        if let Some(created) = view.space.metadata.created_at {
            let label = created.to_chrono().format("%Y-%m").to_string();
            if let Some(count) = month_counts.get_mut(&label) {
                *count += 1;
            }
        }
    }
    let monthly_created = month_labels
        .into_iter()
        .map(|month| {
            let count = month_counts.get(&month).copied().unwrap_or(0);
            MonthlyCount { month, count }
        })
        .collect();

    // distributions
    let mut status_distribution = StatusDistribution::default();
    let mut engagement: BTreeMap<String, u32> = BTreeMap::new();
    for view in &org.spaces {
        status_distribution.record(view.space.status);
        let level = view
            .space
            .engagement_level
            .clone()
            .unwrap_or_else(|| "unscored".into());
        *engagement.entry(level).or_default() += 1;
    }
    let engagement_distribution = engagement
        .into_iter()
        .map(|(level, count)| EngagementBucket { level, count })
        .collect();

    // funnel: created → invited → accessed → completed
    let invited = org
        .spaces
        .iter()
        .filter(|v| org.members.iter().any(|m| m.space_id == v.space.space_id))
        .count() as u32;
    let accessed = org
        .spaces
        .iter()
        .filter(|v| {
            org.activity
                .iter()
                .any(|a| a.space_id == v.space.space_id && a.is_portal_visit())
        })
        .count() as u32;
    let funnel = vec![
        FunnelStage {
            stage: "created".into(),
            count: org.spaces.len() as u32,
        },
        FunnelStage {
            stage: "invited".into(),
            count: invited,
        },
        FunnelStage {
            stage: "accessed".into(),
            count: accessed,
        },
        FunnelStage {
            stage: "completed".into(),
            count: status_distribution.completed,
        },
    ];

    // go-lives within the next 30 days
    let horizon = iso(today + Days::new(30));
    let mut upcoming_go_lives: Vec<GoLive> = org
        .spaces
        .iter()
        .filter(|v| v.space.status == SpaceStatus::Active)
        .filter_map(|v| {
            let target = v.space.target_date.clone()?;
            if target.as_str() >= today_str.as_str() && target <= horizon {
                Some(GoLive {
                    space_id: v.space.space_id.clone(),
                    name: v.space.name.clone(),
                    client_name: v.space.client_name.clone(),
                    target_date: target,
                    progress_percentage: compute_space_progress(v).progress_percentage,
                })
            } else {
                None
            }
        })
        .collect();
    upcoming_go_lives.sort_by(|a, b| a.target_date.cmp(&b.target_date));

    InsightsData {
        avg_completion_days,
        avg_days_to_first_access,
        access_distribution,
        monthly_created,
        status_distribution,
        engagement_distribution,
        funnel,
        upcoming_go_lives,
    }
}

/// Async entry points over live data
#[derive(Clone)]
pub struct AnalyticsService {
    loader: ViewLoader,
}

impl AnalyticsService {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            loader: ViewLoader::new(client).await?,
        })
    }

    pub async fn get_space_stats(&self, org_id: &str) -> Result<SpaceStats> {
        let org = self.loader.load_org_view(org_id).await?;
        Ok(space_stats(&org, &progress::today_string()))
    }

    pub async fn get_dashboard_stats(&self, org_id: &str) -> Result<DashboardStats> {
        let org = self.loader.load_org_view(org_id).await?;
        Ok(dashboard_stats(&org, Utc::now().date_naive()))
    }

    pub async fn get_insights_data(&self, org_id: &str) -> Result<InsightsData> {
        let org = self.loader.load_org_view(org_id).await?;
        Ok(insights(&org, Utc::now().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{actions, ActivityDoc, MemberDoc, Metadata};
    use crate::progress::test_fixtures::*;
    use bson::DateTime as BsonDateTime;
    use chrono::TimeZone;

    fn ts(year: i32, month: u32, day: u32) -> BsonDateTime {
        BsonDateTime::from_chrono(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap())
    }

    fn status_change(space_id: &str, to: &str, at: BsonDateTime) -> ActivityDoc {
        ActivityDoc {
            space_id: space_id.into(),
            actor_email: "ops@vendor.com".into(),
            action: actions::STATUS_CHANGED.into(),
            detail: serde_json::json!({ "to": to }),
            occurred_at: at,
            metadata: Metadata::new(),
            ..Default::default()
        }
    }

    fn visit(space_id: &str, email: &str, at: BsonDateTime) -> ActivityDoc {
        ActivityDoc {
            space_id: space_id.into(),
            actor_email: email.into(),
            action: actions::PORTAL_FIRST_VISIT.into(),
            occurred_at: at,
            metadata: Metadata::new(),
            ..Default::default()
        }
    }

    fn member(space_id: &str, email: &str, invited: Option<BsonDateTime>) -> MemberDoc {
        MemberDoc {
            space_id: space_id.into(),
            invited_email: email.into(),
            invited_at: invited,
            metadata: Metadata::new(),
            ..Default::default()
        }
    }

    fn org_with(
        spaces: Vec<crate::db::views::SpaceView>,
        members: Vec<MemberDoc>,
        mut activity: Vec<ActivityDoc>,
    ) -> OrgView {
        activity.sort_by_key(|a| a.occurred_at);
        OrgView {
            spaces,
            members,
            activity,
        }
    }

    #[test]
    fn test_completion_duration_kpi() {
        let mut done = sample_space_view();
        done.space.space_id = "done".into();
        done.space.status = SpaceStatus::Completed;

        // transitioned to active on the 1st, completed on the 11th
        let activity = vec![
            status_change("done", "active", ts(2026, 3, 1)),
            status_change("done", "completed", ts(2026, 3, 11)),
        ];
        let org = org_with(vec![done], vec![], activity);
        let data = insights(&org, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        assert_eq!(data.avg_completion_days, Some(10));
    }

    #[test]
    fn test_completion_kpi_skips_partial_histories() {
        let mut done = sample_space_view();
        done.space.space_id = "done".into();
        done.space.status = SpaceStatus::Completed;

        // only the completion transition was ever logged
        let activity = vec![status_change("done", "completed", ts(2026, 3, 11))];
        let org = org_with(vec![done], vec![], activity);
        let data = insights(&org, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        assert_eq!(data.avg_completion_days, None);
    }

    #[test]
    fn test_access_buckets() {
        let mut space = sample_space_view();
        space.space.space_id = "s1".into();

        let members = vec![
            // visits 5 days after the invite: 4-7 bucket
            member("s1", "five@example.com", Some(ts(2026, 4, 1))),
            // same-day visit
            member("s1", "zero@example.com", Some(ts(2026, 4, 1))),
            // invited, never visited
            member("s1", "ghost@example.com", Some(ts(2026, 4, 1))),
        ];
        let activity = vec![
            visit("s1", "five@example.com", ts(2026, 4, 6)),
            visit("s1", "zero@example.com", ts(2026, 4, 1)),
        ];

        let org = org_with(vec![space], members, activity);
        let data = insights(&org, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        assert_eq!(data.access_distribution.four_to_seven_days, 1);
        assert_eq!(data.access_distribution.same_day, 1);
        assert_eq!(data.access_distribution.not_accessed, 1);
        // mean of 5 and 0 days to one decimal
        assert_eq!(data.avg_days_to_first_access, Some(2.5));
    }

    #[test]
    fn test_access_bucket_edges() {
        let mut space = sample_space_view();
        space.space.space_id = "s1".into();

        // day 3 closes the 1-3 bucket, day 7 closes 4-7, day 8 opens 7+
        let members = vec![
            member("s1", "three@example.com", Some(ts(2026, 4, 1))),
            member("s1", "seven@example.com", Some(ts(2026, 4, 1))),
            member("s1", "eight@example.com", Some(ts(2026, 4, 1))),
        ];
        let activity = vec![
            visit("s1", "three@example.com", ts(2026, 4, 4)),
            visit("s1", "seven@example.com", ts(2026, 4, 8)),
            visit("s1", "eight@example.com", ts(2026, 4, 9)),
        ];

        let org = org_with(vec![space], members, activity);
        let data = insights(&org, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        assert_eq!(data.access_distribution.one_to_three_days, 1);
        assert_eq!(data.access_distribution.four_to_seven_days, 1);
        assert_eq!(data.access_distribution.over_seven_days, 1);
        assert_eq!(data.access_distribution.same_day, 0);
        assert_eq!(data.access_distribution.not_accessed, 0);
        // mean of 3, 7, and 8 days
        assert_eq!(data.avg_days_to_first_access, Some(6.0));
    }

    #[test]
    fn test_funnel_counts() {
        let mut a = sample_space_view();
        a.space.space_id = "a".into();
        let mut b = empty_space_view();
        b.space.space_id = "b".into();
        let mut c = empty_space_view();
        c.space.space_id = "c".into();
        c.space.status = SpaceStatus::Completed;

        let members = vec![
            member("a", "one@example.com", Some(ts(2026, 1, 1))),
            member("c", "two@example.com", Some(ts(2026, 1, 1))),
        ];
        let activity = vec![visit("a", "one@example.com", ts(2026, 1, 2))];

        let org = org_with(vec![a, b, c], members, activity);
        let data = insights(&org, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        let counts: Vec<u32> = data.funnel.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![3, 2, 1, 1]);
    }

    #[test]
    fn test_monthly_window_is_trailing_twelve() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        let mut recent = empty_space_view();
        recent.space.space_id = "recent".into();
        recent.space.metadata.created_at = Some(ts(2026, 8, 3));
        let mut old = empty_space_view();
        old.space.space_id = "old".into();
        old.space.metadata.created_at = Some(ts(2024, 1, 1));

        let org = org_with(vec![recent, old], vec![], vec![]);
        let data = insights(&org, today);
        assert_eq!(data.monthly_created.len(), 12);
        assert_eq!(data.monthly_created[0].month, "2025-09");
        assert_eq!(data.monthly_created[11].month, "2026-08");
        assert_eq!(data.monthly_created[11].count, 1);
        // the 2024 space falls outside the window entirely
        let total: u32 = data.monthly_created.iter().map(|m| m.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_needs_attention_ranking() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        // two overdue tasks, low progress
        let mut worst = space_with_due_dates(&[("2026-01-01", false), ("2026-01-02", false)]);
        worst.space.space_id = "worst".into();
        // one overdue task
        let mut bad = space_with_due_dates(&[("2026-01-01", false), ("2026-12-01", false)]);
        bad.space.space_id = "bad".into();
        // nothing overdue, progress 0% < 30%
        let mut slow = space_with_due_dates(&[("2026-12-01", false)]);
        slow.space.space_id = "slow".into();
        // fully complete, nothing overdue: not a candidate
        let mut fine = space_with_due_dates(&[("2026-12-01", true)]);
        fine.space.space_id = "fine".into();

        let org = org_with(vec![worst, bad, slow, fine], vec![], vec![]);
        let dash = dashboard_stats(&org, today);
        let ranked: Vec<&str> = dash
            .needs_attention
            .iter()
            .map(|s| s.space_id.as_str())
            .collect();
        assert_eq!(ranked, vec!["worst", "bad", "slow"]);
        assert_eq!(dash.overdue_tasks.len(), 3);
    }

    #[test]
    fn test_upcoming_go_lives_window() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        let mut soon = empty_space_view();
        soon.space.space_id = "soon".into();
        soon.space.status = SpaceStatus::Active;
        soon.space.target_date = Some("2026-09-10".into());

        let mut far = empty_space_view();
        far.space.space_id = "far".into();
        far.space.status = SpaceStatus::Active;
        far.space.target_date = Some("2026-12-01".into());

        let mut past = empty_space_view();
        past.space.space_id = "past".into();
        past.space.status = SpaceStatus::Active;
        past.space.target_date = Some("2026-08-01".into());

        let org = org_with(vec![soon, far, past], vec![], vec![]);
        let data = insights(&org, today);
        assert_eq!(data.upcoming_go_lives.len(), 1);
        assert_eq!(data.upcoming_go_lives[0].space_id, "soon");
    }

    #[test]
    fn test_space_stats_rollup() {
        let today = "2026-08-29";

        let mut active = sample_space_view(); // 33%
        active.space.space_id = "active".into();
        let mut risky = space_with_due_dates(&[("2026-01-01", false)]); // all overdue
        risky.space.space_id = "risky".into();
        let mut draft = empty_space_view();
        draft.space.space_id = "draft".into();
        draft.space.status = SpaceStatus::Draft;

        let org = org_with(vec![active, risky, draft], vec![], vec![]);
        let stats = space_stats(&org, today);
        assert_eq!(stats.total_spaces, 3);
        assert_eq!(stats.by_status.active, 2);
        assert_eq!(stats.by_status.draft, 1);
        assert_eq!(stats.at_risk, 1);
        // mean of 33, 0, 0
        assert_eq!(stats.average_progress, 11);
    }
}
