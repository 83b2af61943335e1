//! Shared types for Gangway

pub mod error;

pub use error::{GangwayError, Result};
