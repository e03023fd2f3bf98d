//! Repository for the `read_marks` table.

use askboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::read_mark::ReadMark;

/// Column list for read_marks queries.
const COLUMNS: &str = "answer_id, user_id, is_read, created_at, updated_at";

/// Provides per-(answer, user) read state.
pub struct ReadMarkRepo;

impl ReadMarkRepo {
    /// Mark an answer as read by a user.
    ///
    /// Creates the mark on first call, flips an unread mark to read, and
    /// leaves an already-read mark untouched.
    pub async fn mark_read(
        pool: &PgPool,
        answer_id: DbId,
        user_id: DbId,
    ) -> Result<ReadMark, sqlx::Error> {
        let query = format!(
            "INSERT INTO read_marks (answer_id, user_id, is_read)
             VALUES ($1, $2, TRUE)
             ON CONFLICT (answer_id, user_id) DO UPDATE SET is_read = TRUE
             WHERE read_marks.is_read = FALSE
             RETURNING {COLUMNS}"
        );
        let written = sqlx::query_as::<_, ReadMark>(&query)
            .bind(answer_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        match written {
            Some(mark) => Ok(mark),
            // Conflict target was already read; nothing was written.
            None => Self::find(pool, answer_id, user_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Flip an existing mark back to unread. Returns `None` if the user
    /// never read the answer.
    pub async fn mark_unread(
        pool: &PgPool,
        answer_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ReadMark>, sqlx::Error> {
        let query = format!(
            "UPDATE read_marks SET is_read = FALSE
             WHERE answer_id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReadMark>(&query)
            .bind(answer_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the mark for an (answer, user) pair.
    pub async fn find(
        pool: &PgPool,
        answer_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ReadMark>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM read_marks
             WHERE answer_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, ReadMark>(&query)
            .bind(answer_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The subset of `answer_ids` that `user_id` has read.
    pub async fn read_answer_ids(
        pool: &PgPool,
        user_id: DbId,
        answer_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if answer_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar(
            "SELECT answer_id FROM read_marks
             WHERE user_id = $1 AND is_read = TRUE AND answer_id = ANY($2)",
        )
        .bind(user_id)
        .bind(answer_ids)
        .fetch_all(pool)
        .await
    }

    /// Count entries of `answer_ids` without a read mark for `user_id`.
    /// Duplicate ids count once per occurrence.
    pub async fn count_unread_among(
        pool: &PgPool,
        user_id: DbId,
        answer_ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        if answer_ids.is_empty() {
            return Ok(0);
        }
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM UNNEST($2::BIGINT[]) AS listed(answer_id)
             WHERE NOT EXISTS (
                 SELECT 1 FROM read_marks r
                 WHERE r.answer_id = listed.answer_id
                   AND r.user_id = $1
                   AND r.is_read = TRUE
             )",
        )
        .bind(user_id)
        .bind(answer_ids)
        .fetch_one(pool)
        .await
    }

    /// Count every answer in the system `user_id` has not read.
    pub async fn count_unread_all(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM answers a
             WHERE NOT EXISTS (
                 SELECT 1 FROM read_marks r
                 WHERE r.answer_id = a.id
                   AND r.user_id = $1
                   AND r.is_read = TRUE
             )",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
