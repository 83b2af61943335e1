//! Gangway - progress and access-control core for the client portal
//!
//! Gangway organizes customer-implementation work into tenant-owned spaces
//! of pages and blocks, and derives completion, overdue, and risk signals
//! from the state of those blocks.
//!
//! ## Subsystems
//!
//! - **Content model**: spaces, pages, polymorphic blocks, single-row
//!   responses, file records ([`db::schemas`], [`content`])
//! - **Task addressing**: fixed-width composite keys for sub-items ([`ids`])
//! - **Progress engine**: per-page and per-space completion, overdue and
//!   at-risk detection ([`progress`])
//! - **Access control gate**: staff and stakeholder identity planes with a
//!   draft/active/completed/archived lifecycle gate ([`auth`])
//! - **Activity & analytics**: append-only audit log with fire-and-forget
//!   notification hooks, plus funnels, cohort buckets, and KPIs mined from
//!   it ([`activity`], [`analytics`])

pub mod activity;
pub mod analytics;
pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod ids;
pub mod progress;
pub mod services;
pub mod types;

pub use config::Args;
pub use types::{GangwayError, Result};
