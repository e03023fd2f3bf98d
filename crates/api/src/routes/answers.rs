//! Route definitions for the `/answers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::answers;
use crate::state::AppState;

/// Routes mounted at `/answers`.
///
/// ```text
/// GET    /{id}            -> get_answer
/// PUT    /{id}            -> update_answer
/// DELETE /{id}            -> delete_answer
/// GET    /{id}/replies    -> list_replies
/// POST   /{id}/replies    -> create_reply
/// POST   /{id}/read       -> mark_read
/// DELETE /{id}/read       -> mark_unread
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(answers::get_answer)
                .put(answers::update_answer)
                .delete(answers::delete_answer),
        )
        .route(
            "/{id}/replies",
            get(answers::list_replies).post(answers::create_reply),
        )
        .route(
            "/{id}/read",
            post(answers::mark_read).delete(answers::mark_unread),
        )
}
