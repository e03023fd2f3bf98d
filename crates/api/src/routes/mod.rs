pub mod answers;
pub mod health;
pub mod questions;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /questions                        list, create
/// /questions/unresolved             unresolved questions
/// /questions/answered               questions with at least one answer
/// /questions/unanswered             questions with no answers
/// /questions/mine/unresolved        caller's unresolved, with unread counts
/// /questions/similar                duplicate detection for a draft
/// /questions/by-title               exact title lookup
/// /questions/{id}                   get, update, delete (cascade)
/// /questions/{id}/answers           list, create
/// /questions/{id}/potential-answers attached answers minus preferred
/// /questions/{id}/thread            question plus full reply tree
/// /questions/{id}/preferred-answer  get, set, clear
/// /questions/{id}/unread-count      caller's unread answers
///
/// /answers/{id}                     get, update, delete (cascade)
/// /answers/{id}/replies             list, create
/// /answers/{id}/read                mark read (POST), mark unread (DELETE)
///
/// /me/unread-count                  caller's unread answers system-wide
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/questions", questions::router())
        .nest("/answers", answers::router())
        .route("/me/unread-count", get(handlers::me::unread_count))
}
