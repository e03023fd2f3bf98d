//! Handlers for the `/questions` resource.
//!
//! Every handler goes through [`askboard_qa::QaFacade`]; writes are
//! attributed to the [`RequestUser`].

use askboard_core::error::CoreError;
use askboard_core::types::DbId;
use askboard_db::models::question::UpdateQuestion;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::user::RequestUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPreferredRequest {
    pub answer_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct TitleParams {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub user_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<DbId>,
    pub unread: i64,
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// GET /api/v1/questions
pub async fn list_questions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let questions = state.qa.list_questions().await?;
    Ok(Json(DataResponse { data: questions }))
}

/// POST /api/v1/questions
pub async fn create_question(
    user: RequestUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuestionRequest>,
) -> AppResult<impl IntoResponse> {
    let question = state
        .qa
        .register_question(&input.title, &input.body, user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// GET /api/v1/questions/unresolved
pub async fn list_unresolved(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let questions = state.qa.unresolved_questions().await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/questions/mine/unresolved
///
/// The caller's own unresolved questions with per-question unread counts.
pub async fn list_my_unresolved(
    user: RequestUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let questions = state.qa.unresolved_questions_for(user.user_id).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/questions/answered
pub async fn list_answered(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let questions = state.qa.answered_questions().await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/questions/unanswered
pub async fn list_unanswered(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let questions = state.qa.unanswered_questions().await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/questions/similar?title=..&body=..&threshold=..
pub async fn similar_questions(
    State(state): State<AppState>,
    Query(params): Query<SimilarParams>,
) -> AppResult<impl IntoResponse> {
    let similar = state
        .qa
        .similar_questions(&params.title, &params.body, params.threshold)
        .await?;
    Ok(Json(DataResponse { data: similar }))
}

/// GET /api/v1/questions/by-title?title=..
pub async fn get_by_title(
    State(state): State<AppState>,
    Query(params): Query<TitleParams>,
) -> AppResult<impl IntoResponse> {
    let question = state.qa.question_by_title(&params.title).await?;
    Ok(Json(DataResponse { data: question }))
}

// ---------------------------------------------------------------------------
// Single question
// ---------------------------------------------------------------------------

/// GET /api/v1/questions/{id}
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let question = state.qa.question(id).await?;
    Ok(Json(DataResponse { data: question }))
}

/// PUT /api/v1/questions/{id}
pub async fn update_question(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuestion>,
) -> AppResult<impl IntoResponse> {
    if input.title.is_none() && input.body.is_none() {
        return Err(AppError::BadRequest(
            "At least one of title or body is required".into(),
        ));
    }
    let question = state.qa.edit_question(id, &input).await?;
    tracing::debug!(question_id = id, user_id = user.user_id, "Question edited via API");
    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/v1/questions/{id}
///
/// Removes the question and every answer beneath it.
pub async fn delete_question(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !state.qa.delete_question(id).await? {
        return Err(CoreError::NotFound {
            entity: "Question",
            id,
        }
        .into());
    }
    tracing::debug!(question_id = id, user_id = user.user_id, "Question deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Answers under a question
// ---------------------------------------------------------------------------

/// GET /api/v1/questions/{id}/answers
pub async fn list_answers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let answers = state.qa.answers_for_question(id).await?;
    Ok(Json(DataResponse { data: answers }))
}

/// POST /api/v1/questions/{id}/answers
pub async fn create_answer(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let answer = state.qa.register_answer(id, &input.text, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: answer })))
}

/// GET /api/v1/questions/{id}/potential-answers
pub async fn potential_answers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let answers = state.qa.potential_answers(id).await?;
    Ok(Json(DataResponse { data: answers }))
}

/// GET /api/v1/questions/{id}/thread
pub async fn thread(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let thread = state.qa.thread(id).await?;
    Ok(Json(DataResponse { data: thread }))
}

/// GET /api/v1/questions/{id}/preferred-answer
///
/// `data` is `null` while the question is unresolved.
pub async fn get_preferred_answer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let answer = state.qa.preferred_answer(id).await?;
    Ok(Json(DataResponse { data: answer }))
}

/// PUT /api/v1/questions/{id}/preferred-answer
pub async fn set_preferred_answer(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetPreferredRequest>,
) -> AppResult<impl IntoResponse> {
    let question = state.qa.accept_answer(id, input.answer_id).await?;
    tracing::debug!(
        question_id = id,
        answer_id = input.answer_id,
        user_id = user.user_id,
        "Preferred answer set via API"
    );
    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/v1/questions/{id}/preferred-answer
pub async fn clear_preferred_answer(
    _user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let question = state.qa.clear_accepted_answer(id).await?;
    Ok(Json(DataResponse { data: question }))
}

/// GET /api/v1/questions/{id}/unread-count
pub async fn unread_count(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let unread = state.qa.unread_count(user.user_id, Some(id)).await?;
    Ok(Json(DataResponse {
        data: UnreadCount {
            user_id: user.user_id,
            question_id: Some(id),
            unread,
        },
    }))
}
