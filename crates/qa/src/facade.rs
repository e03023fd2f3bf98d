//! Single entry point for Q&A callers (HTTP handlers, tools, tests).
//!
//! Composes the question, answer and read-tracking stores, re-reads rows
//! after writes so callers always receive fully composed views, and logs
//! every successful write.

use std::sync::Arc;

use askboard_core::text_index::DEFAULT_SIMILARITY_THRESHOLD;
use askboard_core::types::DbId;
use askboard_core::users::UserDirectory;
use askboard_db::models::answer::UpdateAnswer;
use askboard_db::models::question::UpdateQuestion;
use askboard_db::models::read_mark::ReadMark;
use sqlx::PgPool;

use crate::answers::AnswerStore;
use crate::error::{not_found, QaResult};
use crate::questions::{QuestionStore, SimilarQuestion};
use crate::read_tracking::ReadTracker;
use crate::views::{AnswerView, QuestionThread, QuestionView};

#[derive(Clone)]
pub struct QaFacade {
    questions: QuestionStore,
    answers: AnswerStore,
    reads: ReadTracker,
}

impl QaFacade {
    pub fn new(pool: PgPool, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            questions: QuestionStore::new(pool.clone(), Arc::clone(&users)),
            answers: AnswerStore::new(pool.clone(), users),
            reads: ReadTracker::new(pool),
        }
    }

    pub fn questions(&self) -> &QuestionStore {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn reads(&self) -> &ReadTracker {
        &self.reads
    }

    // -- Questions -----------------------------------------------------------

    pub async fn register_question(
        &self,
        title: &str,
        body: &str,
        author_id: DbId,
    ) -> QaResult<QuestionView> {
        let id = self.questions.create(title, body, author_id).await?;
        tracing::info!(question_id = id, author_id, "Question registered");
        self.questions.get_by_id(id).await
    }

    pub async fn question(&self, id: DbId) -> QaResult<QuestionView> {
        self.questions.get_by_id(id).await
    }

    pub async fn question_by_title(&self, title: &str) -> QaResult<QuestionView> {
        self.questions.get_by_title(title).await
    }

    pub async fn edit_question(&self, id: DbId, input: &UpdateQuestion) -> QaResult<QuestionView> {
        let view = self
            .questions
            .update(id, input)
            .await?
            .ok_or_else(|| not_found("Question", id))?;
        tracing::info!(question_id = id, "Question updated");
        Ok(view)
    }

    /// Returns whether the question existed.
    pub async fn delete_question(&self, id: DbId) -> QaResult<bool> {
        let deleted = self.questions.delete(id).await?;
        if deleted {
            tracing::info!(question_id = id, "Question deleted");
        }
        Ok(deleted)
    }

    pub async fn list_questions(&self) -> QaResult<Vec<QuestionView>> {
        self.questions.list_all().await
    }

    pub async fn unresolved_questions(&self) -> QaResult<Vec<QuestionView>> {
        self.questions.list_unresolved().await
    }

    pub async fn unresolved_questions_for(&self, user_id: DbId) -> QaResult<Vec<QuestionView>> {
        self.questions.list_unresolved_for_user(user_id).await
    }

    pub async fn answered_questions(&self) -> QaResult<Vec<QuestionView>> {
        self.questions.list_answered().await
    }

    pub async fn unanswered_questions(&self) -> QaResult<Vec<QuestionView>> {
        self.questions.list_unanswered().await
    }

    /// Existing questions that look like the draft. Uses
    /// [`DEFAULT_SIMILARITY_THRESHOLD`] when `threshold` is `None`.
    pub async fn similar_questions(
        &self,
        title: &str,
        body: &str,
        threshold: Option<f64>,
    ) -> QaResult<Vec<SimilarQuestion>> {
        self.questions
            .find_similar(title, body, threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD))
            .await
    }

    // -- Answers -------------------------------------------------------------

    /// Create an answer under a question. The row and the relation-list
    /// update commit together.
    pub async fn register_answer(
        &self,
        question_id: DbId,
        text: &str,
        author_id: DbId,
    ) -> QaResult<AnswerView> {
        let id = self
            .answers
            .create_under_question(text, author_id, question_id)
            .await?;
        tracing::info!(answer_id = id, question_id, author_id, "Answer registered");
        self.answers.get_by_id(id).await
    }

    /// Create a nested reply under an existing answer.
    pub async fn register_reply(
        &self,
        parent_answer_id: DbId,
        text: &str,
        author_id: DbId,
    ) -> QaResult<AnswerView> {
        let id = self
            .answers
            .create_under_answer(text, author_id, parent_answer_id)
            .await?;
        tracing::info!(answer_id = id, parent_answer_id, author_id, "Reply registered");
        self.answers.get_by_id(id).await
    }

    pub async fn answer(&self, id: DbId) -> QaResult<AnswerView> {
        self.answers.get_by_id(id).await
    }

    pub async fn edit_answer(&self, id: DbId, input: &UpdateAnswer) -> QaResult<AnswerView> {
        let view = self
            .answers
            .update(id, input)
            .await?
            .ok_or_else(|| not_found("Answer", id))?;
        tracing::info!(answer_id = id, "Answer updated");
        Ok(view)
    }

    /// Returns whether the answer existed.
    pub async fn delete_answer(&self, id: DbId) -> QaResult<bool> {
        let deleted = self.answers.delete(id).await?;
        if deleted {
            tracing::info!(answer_id = id, "Answer deleted");
        }
        Ok(deleted)
    }

    pub async fn answers_for_question(&self, question_id: DbId) -> QaResult<Vec<AnswerView>> {
        self.answers.list_for_question(question_id).await
    }

    pub async fn replies_for_answer(&self, answer_id: DbId) -> QaResult<Vec<AnswerView>> {
        self.answers.list_for_answer(answer_id).await
    }

    pub async fn potential_answers(&self, question_id: DbId) -> QaResult<Vec<AnswerView>> {
        self.questions.potential_answers(question_id).await
    }

    pub async fn preferred_answer(&self, question_id: DbId) -> QaResult<Option<AnswerView>> {
        self.questions.preferred_answer(question_id).await
    }

    /// Mark an attached answer as the accepted one.
    pub async fn accept_answer(&self, question_id: DbId, answer_id: DbId) -> QaResult<QuestionView> {
        let view = self
            .questions
            .set_preferred_answer(question_id, answer_id)
            .await?;
        tracing::info!(question_id, answer_id, "Preferred answer set");
        Ok(view)
    }

    pub async fn clear_accepted_answer(&self, question_id: DbId) -> QaResult<QuestionView> {
        let view = self.questions.clear_preferred_answer(question_id).await?;
        tracing::info!(question_id, "Preferred answer cleared");
        Ok(view)
    }

    /// The question together with its whole reply tree.
    pub async fn thread(&self, question_id: DbId) -> QaResult<QuestionThread> {
        let question = self.questions.get_by_id(question_id).await?;
        let answers = self.answers.thread(&question.answer_ids).await?;
        Ok(QuestionThread { question, answers })
    }

    // -- Read tracking -------------------------------------------------------

    pub async fn mark_read(&self, answer_id: DbId, user_id: DbId) -> QaResult<ReadMark> {
        let mark = self.reads.mark_read(answer_id, user_id).await?;
        tracing::debug!(answer_id, user_id, "Answer marked read");
        Ok(mark)
    }

    pub async fn mark_unread(&self, answer_id: DbId, user_id: DbId) -> QaResult<bool> {
        self.reads.mark_unread(answer_id, user_id).await
    }

    pub async fn unread_count(&self, user_id: DbId, question_id: Option<DbId>) -> QaResult<i64> {
        self.reads.unread_count(user_id, question_id).await
    }
}
