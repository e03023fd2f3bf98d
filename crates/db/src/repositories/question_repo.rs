//! Repository for the `questions` table.
//!
//! Relation-list mutations lock the question row (`SELECT ... FOR UPDATE`)
//! inside a transaction before re-encoding, so concurrent attaches to the
//! same question cannot lose each other's writes.

use askboard_core::relation;
use askboard_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::question::{CreateQuestion, Question, UpdateQuestion};
use crate::repositories::answer_repo::AnswerRepo;

/// Column list for questions queries.
const COLUMNS: &str = "id, title, body, author_id, related_answer_ids, \
    preferred_answer_id, created_at, updated_at";

/// SQL expression decoding `related_answer_ids` into a `BIGINT[]`
/// (NULL when the list is empty).
pub(crate) const RELATED_IDS_ARRAY: &str =
    "string_to_array(NULLIF(btrim(related_answer_ids), ''), ',')::BIGINT[]";

/// Provides CRUD and derived queries for questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Insert a new question with no answers and no preferred answer.
    pub async fn create(pool: &PgPool, input: &CreateQuestion) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions (title, body, author_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find a question by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a question by exact title. Titles are not unique; the oldest
    /// match wins.
    pub async fn find_by_title(
        pool: &PgPool,
        title: &str,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions
             WHERE title = $1
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// List every question, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions ORDER BY id ASC");
        sqlx::query_as::<_, Question>(&query).fetch_all(pool).await
    }

    /// List questions without a preferred answer.
    pub async fn list_unresolved(pool: &PgPool) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions
             WHERE preferred_answer_id IS NULL OR preferred_answer_id = 0
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Question>(&query).fetch_all(pool).await
    }

    /// List unresolved questions written by `author_id`.
    pub async fn list_unresolved_by_author(
        pool: &PgPool,
        author_id: DbId,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions
             WHERE author_id = $1
               AND (preferred_answer_id IS NULL OR preferred_answer_id = 0)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// List questions with at least one attached answer.
    pub async fn list_answered(pool: &PgPool) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions
             WHERE btrim(related_answer_ids) <> ''
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Question>(&query).fetch_all(pool).await
    }

    /// List questions with no attached answers.
    pub async fn list_unanswered(pool: &PgPool) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions
             WHERE btrim(related_answer_ids) = ''
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Question>(&query).fetch_all(pool).await
    }

    /// Overwrite title and/or body. Returns `None` if the question does not
    /// exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuestion,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions SET
                title = COALESCE($2, title),
                body = COALESCE($3, body)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .fetch_optional(pool)
            .await
    }

    /// Append `answer_id` to the question's relation list.
    ///
    /// Already-attached ids are left in place (no duplicate is written).
    /// Returns `None` if the question does not exist.
    pub async fn attach_answer(
        pool: &PgPool,
        question_id: DbId,
        answer_id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let question = Self::attach_answer_in(&mut tx, question_id, answer_id).await?;
        tx.commit().await?;
        Ok(question)
    }

    /// Set the preferred answer, only if `answer_id` is attached to the
    /// question. Returns `None` when the question is missing or the answer
    /// is not in its relation list.
    pub async fn set_preferred_answer(
        pool: &PgPool,
        question_id: DbId,
        answer_id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions SET preferred_answer_id = $2
             WHERE id = $1 AND $2 = ANY({RELATED_IDS_ARRAY})
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(question_id)
            .bind(answer_id)
            .fetch_optional(pool)
            .await
    }

    /// Clear the preferred answer. Returns `None` if the question does not
    /// exist.
    pub async fn clear_preferred_answer(
        pool: &PgPool,
        question_id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions SET preferred_answer_id = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(question_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a question and every answer reachable from its relation list,
    /// unlinking those answers from any other question or answer.
    ///
    /// Returns `None` if the question did not exist, otherwise the ids of
    /// the answers removed with it.
    pub async fn delete_cascade(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let related: Option<String> =
            sqlx::query_scalar("DELETE FROM questions WHERE id = $1 RETURNING related_answer_ids")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(related) = related else {
            tx.rollback().await?;
            return Ok(None);
        };

        let removed = AnswerRepo::delete_subtrees_in(&mut tx, &relation::decode(&related)).await?;
        // Answers may also be attached elsewhere; drop those links too.
        Self::detach_answers_everywhere_in(&mut tx, &removed).await?;
        AnswerRepo::detach_replies_everywhere_in(&mut tx, &removed).await?;

        tx.commit().await?;
        Ok(Some(removed))
    }

    // -- Connection-level helpers (run inside a caller's transaction) --------

    /// Lock a question row for the rest of the transaction.
    pub(crate) async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub(crate) async fn attach_answer_in(
        conn: &mut PgConnection,
        question_id: DbId,
        answer_id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let Some(question) = Self::lock_by_id(&mut *conn, question_id).await? else {
            return Ok(None);
        };
        if relation::contains(&question.related_answer_ids, answer_id) {
            return Ok(Some(question));
        }

        let encoded = relation::append(&question.related_answer_ids, answer_id);
        let query = format!(
            "UPDATE questions SET related_answer_ids = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(question_id)
            .bind(&encoded)
            .fetch_optional(conn)
            .await
    }

    /// Remove every id in `answer_ids` from every question that references
    /// one, clearing the preferred answer where it points into the set.
    /// Returns the number of questions touched.
    pub(crate) async fn detach_answers_everywhere_in(
        conn: &mut PgConnection,
        answer_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if answer_ids.is_empty() {
            return Ok(0);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM questions
             WHERE {RELATED_IDS_ARRAY} && $1 OR preferred_answer_id = ANY($1)
             ORDER BY id ASC
             FOR UPDATE"
        );
        let referencing = sqlx::query_as::<_, Question>(&query)
            .bind(answer_ids)
            .fetch_all(&mut *conn)
            .await?;

        for question in &referencing {
            let encoded = relation::remove_all(&question.related_answer_ids, answer_ids);
            sqlx::query(
                "UPDATE questions SET
                    related_answer_ids = $2,
                    preferred_answer_id = CASE
                        WHEN preferred_answer_id = ANY($3) THEN NULL
                        ELSE preferred_answer_id
                    END
                 WHERE id = $1",
            )
            .bind(question.id)
            .bind(&encoded)
            .bind(answer_ids)
            .execute(&mut *conn)
            .await?;
        }

        Ok(referencing.len() as u64)
    }
}
