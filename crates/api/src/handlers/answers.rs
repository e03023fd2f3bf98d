//! Handlers for the `/answers` resource: single answers, nested replies
//! and read marks.

use askboard_core::error::CoreError;
use askboard_core::types::DbId;
use askboard_db::models::answer::UpdateAnswer;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::handlers::questions::CreateAnswerRequest;
use crate::middleware::user::RequestUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/answers/{id}
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let answer = state.qa.answer(id).await?;
    Ok(Json(DataResponse { data: answer }))
}

/// PUT /api/v1/answers/{id}
pub async fn update_answer(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAnswer>,
) -> AppResult<impl IntoResponse> {
    if input.text.is_none() {
        return Err(AppError::BadRequest("text is required".into()));
    }
    let answer = state.qa.edit_answer(id, &input).await?;
    tracing::debug!(answer_id = id, user_id = user.user_id, "Answer edited via API");
    Ok(Json(DataResponse { data: answer }))
}

/// DELETE /api/v1/answers/{id}
///
/// Removes the answer with its reply subtree and unlinks it from its parent.
pub async fn delete_answer(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !state.qa.delete_answer(id).await? {
        return Err(CoreError::NotFound {
            entity: "Answer",
            id,
        }
        .into());
    }
    tracing::debug!(answer_id = id, user_id = user.user_id, "Answer deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/answers/{id}/replies
pub async fn list_replies(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let replies = state.qa.replies_for_answer(id).await?;
    Ok(Json(DataResponse { data: replies }))
}

/// POST /api/v1/answers/{id}/replies
pub async fn create_reply(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let reply = state.qa.register_reply(id, &input.text, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: reply })))
}

/// POST /api/v1/answers/{id}/read
pub async fn mark_read(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mark = state.qa.mark_read(id, user.user_id).await?;
    Ok(Json(DataResponse { data: mark }))
}

/// DELETE /api/v1/answers/{id}/read
pub async fn mark_unread(
    user: RequestUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.qa.mark_unread(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
