//! Caller identity extractor.
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user's id in `x-user-id`.

use askboard_core::types::DbId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf the request is made.
///
/// ```ignore
/// async fn my_handler(user: RequestUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for RequestUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))?;

        let user_id = raw
            .trim()
            .parse::<DbId>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Invalid {USER_ID_HEADER} header: '{raw}'"))
            })?;

        Ok(RequestUser { user_id })
    }
}
