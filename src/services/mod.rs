//! Services layer
//!
//! Mutation flows composing the access gate, the content store, and the
//! activity log. Read-side services live with their engines
//! ([`crate::progress::ProgressService`], [`crate::analytics::AnalyticsService`]).

pub mod actions;

pub use actions::{task_key_in_block, validate_storage_path, ActionService};
