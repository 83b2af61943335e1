//! Database layer: MongoDB wrapper, document schemas, and read views

pub mod mongo;
pub mod schemas;
pub mod views;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection, MutMetadata};
pub use views::{OrgView, SpaceView, ViewLoader};
