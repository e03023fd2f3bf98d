//! Handlers scoped to the calling user.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::handlers::questions::UnreadCount;
use crate::middleware::user::RequestUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me/unread-count
///
/// Answers anywhere in the system the caller has not read.
pub async fn unread_count(
    user: RequestUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let unread = state.qa.unread_count(user.user_id, None).await?;
    Ok(Json(DataResponse {
        data: UnreadCount {
            user_id: user.user_id,
            question_id: None,
            unread,
        },
    }))
}
