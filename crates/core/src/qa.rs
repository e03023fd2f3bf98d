//! Q&A constants, input validation, and resolution predicates.
//!
//! The stores call these before any persistence call so malformed input
//! never reaches the database.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_TITLE_LENGTH: usize = 300;
pub const MAX_BODY_LENGTH: usize = 20_000;
pub const MAX_ANSWER_LENGTH: usize = 20_000;

/// Maximum reply depth expanded by thread views.
pub const MAX_THREAD_DEPTH: usize = 32;

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Ids are BIGSERIAL values, so anything below 1 is malformed.
pub fn validate_id(entity: &str, id: DbId) -> Result<(), CoreError> {
    if id < 1 {
        return Err(CoreError::Validation(format!(
            "{entity} id must be a positive integer, got {id}"
        )));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_text("Title", title, MAX_TITLE_LENGTH)
}

pub fn validate_body(body: &str) -> Result<(), CoreError> {
    validate_text("Body", body, MAX_BODY_LENGTH)
}

pub fn validate_answer_text(text: &str) -> Result<(), CoreError> {
    validate_text("Answer text", text, MAX_ANSWER_LENGTH)
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A question is resolved iff a non-zero preferred answer is set.
pub fn is_resolved(preferred_answer_id: Option<DbId>) -> bool {
    matches!(preferred_answer_id, Some(id) if id != 0)
}

/// A question is answered iff its relation list is non-empty.
pub fn is_answered(answer_ids: &[DbId]) -> bool {
    !answer_ids.is_empty()
}

/// Attached answers minus the preferred one, in attachment order.
pub fn potential_answer_ids(answer_ids: &[DbId], preferred_answer_id: Option<DbId>) -> Vec<DbId> {
    let preferred = preferred_answer_id.filter(|&id| id != 0);
    answer_ids
        .iter()
        .copied()
        .filter(|id| Some(*id) != preferred)
        .collect()
}

/// Number of ids in `answer_ids` without a read mark in `read`.
///
/// Duplicated ids count once per occurrence.
pub fn count_unread(answer_ids: &[DbId], read: &HashSet<DbId>) -> i64 {
    answer_ids.iter().filter(|id| !read.contains(id)).count() as i64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
