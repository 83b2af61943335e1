//! Stable identifiers and the task addressing scheme
//!
//! Every entity id is a canonical 32-character lowercase-hex token (UUIDv4 in
//! simple form). Sub-item status keys build on that fixed width:
//!
//! - plain task, inside its block's response: `{taskId}`
//! - milestone task, inside its block's response: `{milestoneId}-{taskId}`
//! - flattened across a space (upcoming/overdue lists): the owning block id
//!   is prefixed, `{blockId}-{taskId}` or `{blockId}-{milestoneId}-{taskId}`
//!
//! Flattened keys are decomposed by fixed-width segments, never by scanning
//! for the separator, since the remainder of a milestone key contains one.

use uuid::Uuid;

/// Length of a canonical id token
pub const ID_LEN: usize = 32;

const SEP: char = '-';

/// Generate a new canonical id token
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Whether a string is a single canonical id token
pub fn is_canonical_id(s: &str) -> bool {
    s.len() == ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Status key for a task nested under a milestone, scoped to one block's
/// response row
pub fn milestone_task_key(milestone_id: &str, task_id: &str) -> String {
    format!("{milestone_id}{SEP}{task_id}")
}

/// Externally flattened id for a plain task
pub fn external_task_id(block_id: &str, task_id: &str) -> String {
    format!("{block_id}{SEP}{task_id}")
}

/// Externally flattened id for a milestone task
pub fn external_milestone_task_id(block_id: &str, milestone_id: &str, task_id: &str) -> String {
    format!("{block_id}{SEP}{}", milestone_task_key(milestone_id, task_id))
}

/// Split a flattened external id back into `(block_id, task_key)`.
///
/// The block id is the first fixed-width segment; the remainder must itself
/// be a plain task id or a milestone-composite key. Returns `None` for
/// anything else.
pub fn split_external(external_id: &str) -> Option<(&str, &str)> {
    if external_id.len() < ID_LEN + 1 {
        return None;
    }
    let (block_id, rest) = external_id.split_at(ID_LEN);
    if !is_canonical_id(block_id) {
        return None;
    }
    let rest = rest.strip_prefix(SEP)?;
    if is_task_key(rest) {
        Some((block_id, rest))
    } else {
        None
    }
}

/// Split a milestone-composite key into `(milestone_id, task_id)`, if it is
/// one. Plain task ids return `None`.
pub fn split_milestone_key(task_key: &str) -> Option<(&str, &str)> {
    if task_key.len() != ID_LEN * 2 + 1 {
        return None;
    }
    let (milestone_id, rest) = task_key.split_at(ID_LEN);
    let task_id = rest.strip_prefix(SEP)?;
    if is_canonical_id(milestone_id) && is_canonical_id(task_id) {
        Some((milestone_id, task_id))
    } else {
        None
    }
}

/// Whether a string is a valid response status key: a plain task id or a
/// milestone-composite key
pub fn is_task_key(s: &str) -> bool {
    is_canonical_id(s) || split_milestone_key(s).is_some()
}
