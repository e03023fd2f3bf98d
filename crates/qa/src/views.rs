//! Read-time projections of questions and answers.
//!
//! Views join a persisted row with data that is never stored on it: the
//! author's display name, the derived token set, and per-user unread
//! counts.

use std::collections::{HashMap, HashSet};

use askboard_core::qa::MAX_THREAD_DEPTH;
use askboard_core::text_index::TokenSet;
use askboard_core::types::DbId;
use askboard_core::users::UNKNOWN_USER_NAME;
use askboard_db::models::answer::Answer;
use askboard_db::models::question::Question;
use serde::Serialize;

/// A question as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: Question,
    pub answer_ids: Vec<DbId>,
    pub author_name: String,
    pub token_set: TokenSet,
    pub is_resolved: bool,
    pub is_answered: bool,
    /// Only set by per-user listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_answer_count: Option<i64>,
}

impl QuestionView {
    pub fn new(question: Question, author_name: String) -> Self {
        let answer_ids = question.answer_ids();
        Self {
            token_set: question.token_set(),
            is_resolved: question.is_resolved(),
            is_answered: !answer_ids.is_empty(),
            answer_ids,
            author_name,
            question,
            unread_answer_count: None,
        }
    }

    pub fn id(&self) -> DbId {
        self.question.id
    }
}

/// An answer as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    #[serde(flatten)]
    pub answer: Answer,
    pub reply_ids: Vec<DbId>,
    pub author_name: String,
}

impl AnswerView {
    pub fn new(answer: Answer, author_name: String) -> Self {
        Self {
            reply_ids: answer.reply_ids(),
            author_name,
            answer,
        }
    }

    pub fn id(&self) -> DbId {
        self.answer.id
    }
}

/// One answer and its nested replies.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadNode {
    #[serde(flatten)]
    pub answer: AnswerView,
    pub replies: Vec<ThreadNode>,
}

/// A question with its full reply tree.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionThread {
    pub question: QuestionView,
    pub answers: Vec<ThreadNode>,
}

/// Look up a display name resolved earlier in a batch.
pub(crate) fn name_for(names: &HashMap<DbId, String>, user_id: DbId) -> String {
    names
        .get(&user_id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
}

/// Distinct author ids, first-seen order.
pub(crate) fn distinct_ids(ids: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Build reply trees under `roots` from a pre-fetched id → view map.
///
/// Ids missing from `by_id` are skipped. An id already on the current
/// path is not expanded again, and expansion stops at
/// [`MAX_THREAD_DEPTH`] with a warning. A truncated node still carries its
/// `reply_ids`, so callers can page deeper with `list_for_answer`.
pub(crate) fn build_thread(roots: &[DbId], by_id: &HashMap<DbId, AnswerView>) -> Vec<ThreadNode> {
    fn expand(
        ids: &[DbId],
        by_id: &HashMap<DbId, AnswerView>,
        path: &mut Vec<DbId>,
        depth: usize,
    ) -> Vec<ThreadNode> {
        let mut nodes = Vec::new();
        for id in ids {
            if path.contains(id) {
                continue;
            }
            let Some(view) = by_id.get(id) else {
                continue;
            };
            let replies = if depth + 1 < MAX_THREAD_DEPTH {
                path.push(*id);
                let replies = expand(&view.reply_ids, by_id, path, depth + 1);
                path.pop();
                replies
            } else {
                if !view.reply_ids.is_empty() {
                    tracing::warn!(
                        answer_id = *id,
                        hidden_replies = view.reply_ids.len(),
                        max_depth = MAX_THREAD_DEPTH,
                        "Thread depth limit reached; replies not expanded"
                    );
                }
                Vec::new()
            };
            nodes.push(ThreadNode {
                answer: view.clone(),
                replies,
            });
        }
        nodes
    }

    expand(roots, by_id, &mut Vec::new(), 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
