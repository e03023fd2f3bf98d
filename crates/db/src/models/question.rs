//! Question model and DTOs.

use askboard_core::qa;
use askboard_core::relation;
use askboard_core::text_index::{self, TokenSet};
use askboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub author_id: DbId,
    /// Encoded relation list of directly attached answers.
    pub related_answer_ids: String,
    pub preferred_answer_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Question {
    /// Attached answer ids in attachment order.
    pub fn answer_ids(&self) -> Vec<DbId> {
        relation::decode(&self.related_answer_ids)
    }

    pub fn is_resolved(&self) -> bool {
        qa::is_resolved(self.preferred_answer_id)
    }

    pub fn is_answered(&self) -> bool {
        qa::is_answered(&self.answer_ids())
    }

    /// Normalized word set of title and body.
    pub fn token_set(&self) -> TokenSet {
        text_index::question_tokens(&self.title, &self.body)
    }
}

/// DTO for creating a new question.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestion {
    pub title: String,
    pub body: String,
    pub author_id: DbId,
}

/// DTO for updating a question. Author and id are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestion {
    pub title: Option<String>,
    pub body: Option<String>,
}
