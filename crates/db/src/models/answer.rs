//! Answer model and DTOs.

use askboard_core::relation;
use askboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `answers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Answer {
    pub id: DbId,
    pub text: String,
    pub author_id: DbId,
    /// Encoded relation list of nested replies.
    pub related_answer_ids: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Answer {
    /// Ids of direct replies in attachment order.
    pub fn reply_ids(&self) -> Vec<DbId> {
        relation::decode(&self.related_answer_ids)
    }
}

/// DTO for creating a new answer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnswer {
    pub text: String,
    pub author_id: DbId,
}

/// DTO for updating an answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnswer {
    pub text: Option<String>,
}
