//! Answer store: answers attached to questions and nested replies.

use std::collections::HashMap;
use std::sync::Arc;

use askboard_core::qa;
use askboard_core::types::DbId;
use askboard_core::users::UserDirectory;
use askboard_db::models::answer::{Answer, CreateAnswer, UpdateAnswer};
use askboard_db::repositories::{AnswerRepo, QuestionRepo};
use sqlx::PgPool;

use crate::error::{not_found, QaResult};
use crate::views::{self, AnswerView, ThreadNode};

#[derive(Clone)]
pub struct AnswerStore {
    pool: PgPool,
    users: Arc<dyn UserDirectory>,
}

impl AnswerStore {
    pub fn new(pool: PgPool, users: Arc<dyn UserDirectory>) -> Self {
        Self { pool, users }
    }

    /// Create a free-standing answer and return its id.
    pub async fn create(&self, text: &str, author_id: DbId) -> QaResult<DbId> {
        let input = validated_input(text, author_id)?;
        let answer = AnswerRepo::create(&self.pool, &input).await?;
        Ok(answer.id)
    }

    /// Create an answer and attach it to a question, in one transaction.
    pub async fn create_under_question(
        &self,
        text: &str,
        author_id: DbId,
        question_id: DbId,
    ) -> QaResult<DbId> {
        qa::validate_id("Question", question_id)?;
        let input = validated_input(text, author_id)?;
        AnswerRepo::create_under_question(&self.pool, &input, question_id)
            .await?
            .map(|answer| answer.id)
            .ok_or_else(|| not_found("Question", question_id))
    }

    /// Create a nested reply under another answer, in one transaction.
    pub async fn create_under_answer(
        &self,
        text: &str,
        author_id: DbId,
        parent_answer_id: DbId,
    ) -> QaResult<DbId> {
        qa::validate_id("Answer", parent_answer_id)?;
        let input = validated_input(text, author_id)?;
        AnswerRepo::create_under_answer(&self.pool, &input, parent_answer_id)
            .await?
            .map(|answer| answer.id)
            .ok_or_else(|| not_found("Answer", parent_answer_id))
    }

    pub async fn get_by_id(&self, id: DbId) -> QaResult<AnswerView> {
        qa::validate_id("Answer", id)?;
        let answer = AnswerRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("Answer", id))?;
        Ok(self.compose_one(answer).await)
    }

    /// Overwrite the answer text. `Ok(None)` when no row matched.
    pub async fn update(&self, id: DbId, input: &UpdateAnswer) -> QaResult<Option<AnswerView>> {
        qa::validate_id("Answer", id)?;
        if let Some(text) = &input.text {
            qa::validate_answer_text(text)?;
        }
        match AnswerRepo::update(&self.pool, id, input).await? {
            Some(answer) => Ok(Some(self.compose_one(answer).await)),
            None => Ok(None),
        }
    }

    /// Delete an answer and its whole reply subtree, unlinking it from its
    /// parent. Returns whether the answer existed.
    pub async fn delete(&self, id: DbId) -> QaResult<bool> {
        qa::validate_id("Answer", id)?;
        match AnswerRepo::delete_cascade(&self.pool, id).await? {
            Some(removed) => {
                tracing::debug!(answer_id = id, removed = removed.len(), "Answer subtree deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Answers attached to a question, in attachment order. Unknown
    /// questions yield an empty list.
    pub async fn list_for_question(&self, question_id: DbId) -> QaResult<Vec<AnswerView>> {
        qa::validate_id("Question", question_id)?;
        let Some(question) = QuestionRepo::find_by_id(&self.pool, question_id).await? else {
            return Ok(Vec::new());
        };
        self.load_in_order("question", question_id, &question.answer_ids())
            .await
    }

    /// Direct replies to an answer, in attachment order. Unknown answers
    /// yield an empty list.
    pub async fn list_for_answer(&self, answer_id: DbId) -> QaResult<Vec<AnswerView>> {
        qa::validate_id("Answer", answer_id)?;
        let Some(parent) = AnswerRepo::find_by_id(&self.pool, answer_id).await? else {
            return Ok(Vec::new());
        };
        self.load_in_order("answer", answer_id, &parent.reply_ids())
            .await
    }

    /// Full reply trees under `root_ids`.
    ///
    /// Fetches level by level, then assembles the tree in memory. Cycles and
    /// missing rows are tolerated. Chains deeper than
    /// [`qa::MAX_THREAD_DEPTH`] are cut off with a warning; the deepest
    /// returned nodes keep their `reply_ids` for follow-up reads.
    pub async fn thread(&self, root_ids: &[DbId]) -> QaResult<Vec<ThreadNode>> {
        let mut fetched: HashMap<DbId, Answer> = HashMap::new();
        let mut frontier: Vec<DbId> = root_ids.to_vec();
        let mut depth = 0;

        while !frontier.is_empty() && depth < qa::MAX_THREAD_DEPTH {
            let rows = AnswerRepo::find_by_ids(&self.pool, &frontier).await?;
            let mut next = Vec::new();
            for answer in rows {
                next.extend(
                    answer
                        .reply_ids()
                        .into_iter()
                        .filter(|id| !fetched.contains_key(id)),
                );
                fetched.insert(answer.id, answer);
            }
            next.retain(|id| !fetched.contains_key(id));
            frontier = views::distinct_ids(next);
            depth += 1;
        }
        if !frontier.is_empty() {
            tracing::warn!(
                unfetched = frontier.len(),
                max_depth = qa::MAX_THREAD_DEPTH,
                "Thread depth limit reached; deeper replies not loaded"
            );
        }

        let by_id: HashMap<DbId, AnswerView> = self
            .compose(fetched.into_values().collect())
            .await
            .into_iter()
            .map(|view| (view.id(), view))
            .collect();

        Ok(views::build_thread(root_ids, &by_id))
    }

    /// Fetch `ids` and return them in list order.
    ///
    /// Ids with no row are skipped with a warning rather than failing the
    /// whole read.
    pub(crate) async fn load_in_order(
        &self,
        parent_kind: &'static str,
        parent_id: DbId,
        ids: &[DbId],
    ) -> QaResult<Vec<AnswerView>> {
        let rows = AnswerRepo::find_by_ids(&self.pool, ids).await?;
        let by_id: HashMap<DbId, Answer> = rows.into_iter().map(|a| (a.id, a)).collect();

        let mut ordered = Vec::with_capacity(ids.len());
        for &id in ids {
            match by_id.get(&id) {
                Some(answer) => ordered.push(answer.clone()),
                None => tracing::warn!(
                    parent_kind,
                    parent_id,
                    answer_id = id,
                    "Relation list references a missing answer; skipping"
                ),
            }
        }

        Ok(self.compose(ordered).await)
    }

    async fn compose_one(&self, answer: Answer) -> AnswerView {
        let name = self.users.display_name(answer.author_id).await;
        AnswerView::new(answer, name)
    }

    async fn compose(&self, answers: Vec<Answer>) -> Vec<AnswerView> {
        let authors = views::distinct_ids(answers.iter().map(|a| a.author_id));
        let names = self.users.display_names(&authors).await;
        answers
            .into_iter()
            .map(|answer| {
                let name = views::name_for(&names, answer.author_id);
                AnswerView::new(answer, name)
            })
            .collect()
    }
}

fn validated_input(text: &str, author_id: DbId) -> QaResult<CreateAnswer> {
    qa::validate_answer_text(text)?;
    qa::validate_id("Author", author_id)?;
    Ok(CreateAnswer {
        text: text.to_string(),
        author_id,
    })
}
