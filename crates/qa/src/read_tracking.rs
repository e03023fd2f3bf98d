//! Per-(answer, user) read tracking.

use askboard_core::qa;
use askboard_core::types::DbId;
use askboard_db::models::read_mark::ReadMark;
use askboard_db::repositories::{AnswerRepo, QuestionRepo, ReadMarkRepo};
use sqlx::PgPool;

use crate::error::{not_found, QaResult};

#[derive(Clone)]
pub struct ReadTracker {
    pool: PgPool,
}

impl ReadTracker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record that `user_id` has read `answer_id`. Idempotent.
    pub async fn mark_read(&self, answer_id: DbId, user_id: DbId) -> QaResult<ReadMark> {
        self.ensure_answer(answer_id).await?;
        qa::validate_id("User", user_id)?;
        Ok(ReadMarkRepo::mark_read(&self.pool, answer_id, user_id).await?)
    }

    /// Flip a read mark back to unread. Returns whether a mark existed.
    pub async fn mark_unread(&self, answer_id: DbId, user_id: DbId) -> QaResult<bool> {
        self.ensure_answer(answer_id).await?;
        qa::validate_id("User", user_id)?;
        Ok(ReadMarkRepo::mark_unread(&self.pool, answer_id, user_id)
            .await?
            .is_some())
    }

    pub async fn is_read(&self, answer_id: DbId, user_id: DbId) -> QaResult<bool> {
        qa::validate_id("Answer", answer_id)?;
        qa::validate_id("User", user_id)?;
        Ok(ReadMarkRepo::find(&self.pool, answer_id, user_id)
            .await?
            .is_some_and(|mark| mark.is_read))
    }

    /// Answers `user_id` has not read.
    ///
    /// With a question, counts the question's attached answers; without
    /// one, counts every answer in the system.
    pub async fn unread_count(&self, user_id: DbId, question_id: Option<DbId>) -> QaResult<i64> {
        qa::validate_id("User", user_id)?;
        match question_id {
            Some(question_id) => {
                qa::validate_id("Question", question_id)?;
                let question = QuestionRepo::find_by_id(&self.pool, question_id)
                    .await?
                    .ok_or_else(|| not_found("Question", question_id))?;
                Ok(
                    ReadMarkRepo::count_unread_among(&self.pool, user_id, &question.answer_ids())
                        .await?,
                )
            }
            None => Ok(ReadMarkRepo::count_unread_all(&self.pool, user_id).await?),
        }
    }

    async fn ensure_answer(&self, answer_id: DbId) -> QaResult<()> {
        qa::validate_id("Answer", answer_id)?;
        AnswerRepo::find_by_id(&self.pool, answer_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found("Answer", answer_id))
    }
}
