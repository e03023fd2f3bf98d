//! Read mark model.

use askboard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `read_marks` table, keyed by `(answer_id, user_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadMark {
    pub answer_id: DbId,
    pub user_id: DbId,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
