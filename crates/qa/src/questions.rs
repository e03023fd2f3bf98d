//! Question store: CRUD plus the resolved/answered/unread derivations.

use std::collections::HashSet;
use std::sync::Arc;

use askboard_core::error::CoreError;
use askboard_core::qa;
use askboard_core::text_index::{self, SimilarMatch};
use askboard_core::types::DbId;
use askboard_core::users::UserDirectory;
use askboard_db::models::question::{CreateQuestion, Question, UpdateQuestion};
use askboard_db::repositories::{AnswerRepo, QuestionRepo, ReadMarkRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::answers::AnswerStore;
use crate::error::{not_found, QaResult};
use crate::views::{self, AnswerView, QuestionView};

/// A stored question that overlaps a draft.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarQuestion {
    pub question: QuestionView,
    #[serde(flatten)]
    pub score: SimilarMatch,
}

#[derive(Clone)]
pub struct QuestionStore {
    pool: PgPool,
    users: Arc<dyn UserDirectory>,
    answers: AnswerStore,
}

impl QuestionStore {
    pub fn new(pool: PgPool, users: Arc<dyn UserDirectory>) -> Self {
        let answers = AnswerStore::new(pool.clone(), Arc::clone(&users));
        Self {
            pool,
            users,
            answers,
        }
    }

    /// Insert a question with an empty relation list and return its id.
    pub async fn create(&self, title: &str, body: &str, author_id: DbId) -> QaResult<DbId> {
        qa::validate_title(title)?;
        qa::validate_body(body)?;
        qa::validate_id("Author", author_id)?;

        let input = CreateQuestion {
            title: title.to_string(),
            body: body.to_string(),
            author_id,
        };
        let question = QuestionRepo::create(&self.pool, &input).await?;
        Ok(question.id)
    }

    pub async fn get_by_id(&self, id: DbId) -> QaResult<QuestionView> {
        qa::validate_id("Question", id)?;
        let question = QuestionRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("Question", id))?;
        Ok(self.compose_one(question).await)
    }

    /// Exact-title lookup; the oldest of several equal titles wins.
    pub async fn get_by_title(&self, title: &str) -> QaResult<QuestionView> {
        qa::validate_title(title)?;
        let question = QuestionRepo::find_by_title(&self.pool, title)
            .await?
            .ok_or_else(|| CoreError::NotFoundBy {
                entity: "Question",
                field: "title",
                value: title.to_string(),
            })?;
        Ok(self.compose_one(question).await)
    }

    /// Overwrite title and/or body. `Ok(None)` when no row matched.
    pub async fn update(
        &self,
        id: DbId,
        input: &UpdateQuestion,
    ) -> QaResult<Option<QuestionView>> {
        qa::validate_id("Question", id)?;
        if let Some(title) = &input.title {
            qa::validate_title(title)?;
        }
        if let Some(body) = &input.body {
            qa::validate_body(body)?;
        }
        match QuestionRepo::update(&self.pool, id, input).await? {
            Some(question) => Ok(Some(self.compose_one(question).await)),
            None => Ok(None),
        }
    }

    /// Delete a question and every answer reachable from it. Returns whether
    /// the question itself existed.
    pub async fn delete(&self, id: DbId) -> QaResult<bool> {
        qa::validate_id("Question", id)?;
        match QuestionRepo::delete_cascade(&self.pool, id).await? {
            Some(removed) => {
                tracing::debug!(question_id = id, answers_removed = removed.len(), "Question deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mark `answer_id` as the preferred answer.
    ///
    /// The answer must already be attached to the question.
    pub async fn set_preferred_answer(
        &self,
        question_id: DbId,
        answer_id: DbId,
    ) -> QaResult<QuestionView> {
        qa::validate_id("Question", question_id)?;
        qa::validate_id("Answer", answer_id)?;

        if let Some(question) =
            QuestionRepo::set_preferred_answer(&self.pool, question_id, answer_id).await?
        {
            return Ok(self.compose_one(question).await);
        }

        // Nothing updated: tell a missing question apart from a non-member.
        if QuestionRepo::find_by_id(&self.pool, question_id)
            .await?
            .is_none()
        {
            return Err(not_found("Question", question_id));
        }
        Err(CoreError::Validation(format!(
            "Answer {answer_id} is not attached to question {question_id}"
        ))
        .into())
    }

    pub async fn clear_preferred_answer(&self, question_id: DbId) -> QaResult<QuestionView> {
        qa::validate_id("Question", question_id)?;
        let question = QuestionRepo::clear_preferred_answer(&self.pool, question_id)
            .await?
            .ok_or_else(|| not_found("Question", question_id))?;
        Ok(self.compose_one(question).await)
    }

    /// Append an existing answer to the question's relation list. Attaching
    /// an already-attached answer changes nothing.
    pub async fn attach_answer(&self, question_id: DbId, answer_id: DbId) -> QaResult<QuestionView> {
        qa::validate_id("Question", question_id)?;
        qa::validate_id("Answer", answer_id)?;

        if AnswerRepo::find_by_id(&self.pool, answer_id)
            .await?
            .is_none()
        {
            return Err(not_found("Answer", answer_id));
        }
        let question = QuestionRepo::attach_answer(&self.pool, question_id, answer_id)
            .await?
            .ok_or_else(|| not_found("Question", question_id))?;
        Ok(self.compose_one(question).await)
    }

    pub async fn list_all(&self) -> QaResult<Vec<QuestionView>> {
        let questions = QuestionRepo::list_all(&self.pool).await?;
        Ok(self.compose(questions).await)
    }

    pub async fn list_unresolved(&self) -> QaResult<Vec<QuestionView>> {
        let questions = QuestionRepo::list_unresolved(&self.pool).await?;
        Ok(self.compose(questions).await)
    }

    /// Unresolved questions written by `user_id`, each annotated with how
    /// many of its attached answers that user has not read yet.
    pub async fn list_unresolved_for_user(&self, user_id: DbId) -> QaResult<Vec<QuestionView>> {
        qa::validate_id("User", user_id)?;
        let questions = QuestionRepo::list_unresolved_by_author(&self.pool, user_id).await?;

        let all_ids = views::distinct_ids(questions.iter().flat_map(|q| q.answer_ids()));
        let read: HashSet<DbId> = ReadMarkRepo::read_answer_ids(&self.pool, user_id, &all_ids)
            .await?
            .into_iter()
            .collect();

        let mut composed = self.compose(questions).await;
        for view in &mut composed {
            view.unread_answer_count = Some(qa::count_unread(&view.answer_ids, &read));
        }
        Ok(composed)
    }

    pub async fn list_answered(&self) -> QaResult<Vec<QuestionView>> {
        let questions = QuestionRepo::list_answered(&self.pool).await?;
        Ok(self.compose(questions).await)
    }

    pub async fn list_unanswered(&self) -> QaResult<Vec<QuestionView>> {
        let questions = QuestionRepo::list_unanswered(&self.pool).await?;
        Ok(self.compose(questions).await)
    }

    /// Attached answers other than the preferred one, in attachment order.
    /// An unknown question yields an empty list.
    pub async fn potential_answers(&self, question_id: DbId) -> QaResult<Vec<AnswerView>> {
        qa::validate_id("Question", question_id)?;
        let Some(question) = QuestionRepo::find_by_id(&self.pool, question_id).await? else {
            return Ok(Vec::new());
        };
        let ids = qa::potential_answer_ids(&question.answer_ids(), question.preferred_answer_id);
        self.answers
            .load_in_order("question", question_id, &ids)
            .await
    }

    /// The preferred answer, if one is set and still exists.
    pub async fn preferred_answer(&self, question_id: DbId) -> QaResult<Option<AnswerView>> {
        qa::validate_id("Question", question_id)?;
        let question = QuestionRepo::find_by_id(&self.pool, question_id)
            .await?
            .ok_or_else(|| not_found("Question", question_id))?;

        match question.preferred_answer_id.filter(|&id| id != 0) {
            Some(answer_id) => {
                let mut loaded = self
                    .answers
                    .load_in_order("question", question_id, &[answer_id])
                    .await?;
                Ok(loaded.pop())
            }
            None => Ok(None),
        }
    }

    /// Stored questions whose token sets overlap the draft `title` + `body`
    /// by at least `threshold` (Jaccard), most similar first.
    pub async fn find_similar(
        &self,
        title: &str,
        body: &str,
        threshold: f64,
    ) -> QaResult<Vec<SimilarQuestion>> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CoreError::Validation(format!(
                "Similarity threshold must be between 0 and 1, got {threshold}"
            ))
            .into());
        }
        let draft = text_index::question_tokens(title, body);
        if draft.is_empty() {
            return Ok(Vec::new());
        }

        let mut composed = self.list_all().await?;
        let candidates: Vec<(DbId, text_index::TokenSet)> = composed
            .iter()
            .map(|view| (view.id(), view.token_set.clone()))
            .collect();

        let matches = text_index::find_similar(&draft, &candidates, threshold);
        let mut similar = Vec::with_capacity(matches.len());
        for score in matches {
            if let Some(index) = composed.iter().position(|view| view.id() == score.id) {
                similar.push(SimilarQuestion {
                    question: composed.swap_remove(index),
                    score,
                });
            }
        }
        Ok(similar)
    }

    async fn compose_one(&self, question: Question) -> QuestionView {
        let name = self.users.display_name(question.author_id).await;
        QuestionView::new(question, name)
    }

    async fn compose(&self, questions: Vec<Question>) -> Vec<QuestionView> {
        let authors = views::distinct_ids(questions.iter().map(|q| q.author_id));
        let names = self.users.display_names(&authors).await;
        questions
            .into_iter()
            .map(|question| {
                let name = views::name_for(&names, question.author_id);
                QuestionView::new(question, name)
            })
            .collect()
    }
}
