//! MongoDB document schemas
//!
//! One file per collection; every document carries the shared [`Metadata`]
//! block and declares its own indexes via `IntoIndexes`.

pub mod activity;
pub mod block;
pub mod file;
pub mod member;
pub mod metadata;
pub mod page;
pub mod response;
pub mod space;
pub mod staff;

pub use activity::{actions, ActivityDoc, ACTIVITY_COLLECTION};
pub use block::{BlockDoc, BLOCK_COLLECTION};
pub use file::{FileDoc, FILE_COLLECTION};
pub use member::{MemberDoc, MEMBER_COLLECTION};
pub use metadata::Metadata;
pub use page::{PageDoc, PAGE_COLLECTION};
pub use response::{ResponseDoc, RESPONSE_COLLECTION};
pub use space::{SpaceDoc, SpaceStatus, SPACE_COLLECTION};
pub use staff::{StaffDoc, STAFF_COLLECTION};
