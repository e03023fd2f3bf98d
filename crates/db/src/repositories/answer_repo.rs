//! Repository for the `answers` table.
//!
//! Answers hang off a question's relation list or off another answer's
//! relation list (nested replies). Create-then-attach runs in a single
//! transaction, so an answer row never exists without its parent link.

use std::collections::HashSet;

use askboard_core::relation;
use askboard_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::answer::{Answer, CreateAnswer, UpdateAnswer};
use crate::repositories::question_repo::{QuestionRepo, RELATED_IDS_ARRAY};

/// Column list for answers queries.
const COLUMNS: &str = "id, text, author_id, related_answer_ids, created_at, updated_at";

/// Provides CRUD and relation operations for answers.
pub struct AnswerRepo;

impl AnswerRepo {
    /// Insert a free-standing answer (not attached to anything).
    pub async fn create(pool: &PgPool, input: &CreateAnswer) -> Result<Answer, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_in(&mut conn, input).await
    }

    /// Insert an answer and attach it to `question_id`.
    ///
    /// Returns `None` (and writes nothing) if the question does not exist.
    pub async fn create_under_question(
        pool: &PgPool,
        input: &CreateAnswer,
        question_id: DbId,
    ) -> Result<Option<Answer>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let answer = Self::create_in(&mut tx, input).await?;
        if QuestionRepo::attach_answer_in(&mut tx, question_id, answer.id)
            .await?
            .is_none()
        {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(answer))
    }

    /// Insert an answer as a nested reply to `parent_answer_id`.
    ///
    /// Returns `None` (and writes nothing) if the parent does not exist.
    pub async fn create_under_answer(
        pool: &PgPool,
        input: &CreateAnswer,
        parent_answer_id: DbId,
    ) -> Result<Option<Answer>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let answer = Self::create_in(&mut tx, input).await?;
        if Self::attach_reply_in(&mut tx, parent_answer_id, answer.id)
            .await?
            .is_none()
        {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(answer))
    }

    /// Find an answer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Answer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM answers WHERE id = $1");
        sqlx::query_as::<_, Answer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the answers whose ids are in `ids`. Missing ids are simply
    /// absent from the result; order is by id, not by `ids`.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Answer>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM answers WHERE id = ANY($1) ORDER BY id ASC");
        sqlx::query_as::<_, Answer>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List every answer, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Answer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM answers ORDER BY id ASC");
        sqlx::query_as::<_, Answer>(&query).fetch_all(pool).await
    }

    /// Overwrite the answer text. Returns `None` if the answer does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAnswer,
    ) -> Result<Option<Answer>, sqlx::Error> {
        let query = format!(
            "UPDATE answers SET text = COALESCE($2, text)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Answer>(&query)
            .bind(id)
            .bind(&input.text)
            .fetch_optional(pool)
            .await
    }

    /// Append `child_id` to the reply list of `parent_id`.
    ///
    /// Returns `None` if the parent does not exist.
    pub async fn attach_reply(
        pool: &PgPool,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<Option<Answer>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let parent = Self::attach_reply_in(&mut tx, parent_id, child_id).await?;
        tx.commit().await?;
        Ok(parent)
    }

    /// Delete an answer together with its whole reply subtree, and unlink
    /// every deleted id from the questions and answers that referenced it.
    ///
    /// Returns `None` if the answer did not exist, otherwise every deleted id
    /// (the root first).
    pub async fn delete_cascade(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM answers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let removed = Self::delete_subtrees_in(&mut tx, &[id]).await?;
        QuestionRepo::detach_answers_everywhere_in(&mut tx, &removed).await?;
        Self::detach_replies_everywhere_in(&mut tx, &removed).await?;

        tx.commit().await?;
        Ok(Some(removed))
    }

    // -- Connection-level helpers (run inside a caller's transaction) --------

    async fn create_in(conn: &mut PgConnection, input: &CreateAnswer) -> Result<Answer, sqlx::Error> {
        let query = format!(
            "INSERT INTO answers (text, author_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Answer>(&query)
            .bind(&input.text)
            .bind(input.author_id)
            .fetch_one(conn)
            .await
    }

    async fn attach_reply_in(
        conn: &mut PgConnection,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<Option<Answer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM answers WHERE id = $1 FOR UPDATE");
        let Some(parent) = sqlx::query_as::<_, Answer>(&query)
            .bind(parent_id)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };
        if relation::contains(&parent.related_answer_ids, child_id) {
            return Ok(Some(parent));
        }

        let encoded = relation::append(&parent.related_answer_ids, child_id);
        let query = format!(
            "UPDATE answers SET related_answer_ids = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Answer>(&query)
            .bind(parent_id)
            .bind(&encoded)
            .fetch_optional(conn)
            .await
    }

    /// Remove every id in `child_ids` from the reply list of every surviving
    /// answer that holds one.
    pub(crate) async fn detach_replies_everywhere_in(
        conn: &mut PgConnection,
        child_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if child_ids.is_empty() {
            return Ok(0);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM answers
             WHERE {RELATED_IDS_ARRAY} && $1
             ORDER BY id ASC
             FOR UPDATE"
        );
        let parents = sqlx::query_as::<_, Answer>(&query)
            .bind(child_ids)
            .fetch_all(&mut *conn)
            .await?;

        for parent in &parents {
            let encoded = relation::remove_all(&parent.related_answer_ids, child_ids);
            sqlx::query("UPDATE answers SET related_answer_ids = $2 WHERE id = $1")
                .bind(parent.id)
                .bind(&encoded)
                .execute(&mut *conn)
                .await?;
        }

        Ok(parents.len() as u64)
    }

    /// Delete every answer reachable from `roots` through reply lists.
    ///
    /// Walks breadth-first with a visited set, so cyclic or shared reply
    /// lists terminate. Ids with no row are skipped. Returns deleted ids in
    /// visit order.
    pub(crate) async fn delete_subtrees_in(
        conn: &mut PgConnection,
        roots: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let mut visited: HashSet<DbId> = HashSet::new();
        let mut order: Vec<DbId> = Vec::new();
        let mut frontier: Vec<DbId> = roots.to_vec();

        while !frontier.is_empty() {
            let rows: Vec<(DbId, String)> = sqlx::query_as(
                "SELECT id, related_answer_ids FROM answers
                 WHERE id = ANY($1)
                 ORDER BY array_position($1, id)",
            )
            .bind(&frontier)
            .fetch_all(&mut *conn)
            .await?;

            frontier = Vec::new();
            for (id, related) in rows {
                if !visited.insert(id) {
                    continue;
                }
                order.push(id);
                frontier.extend(
                    relation::decode(&related)
                        .into_iter()
                        .filter(|child| !visited.contains(child)),
                );
            }
        }

        if !order.is_empty() {
            sqlx::query("DELETE FROM answers WHERE id = ANY($1)")
                .bind(&order)
                .execute(&mut *conn)
                .await?;
        }

        Ok(order)
    }
}
