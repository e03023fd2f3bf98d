//! Route definitions for the `/questions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::questions;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// GET    /                         -> list_questions
/// POST   /                         -> create_question
/// GET    /unresolved               -> list_unresolved
/// GET    /answered                 -> list_answered
/// GET    /unanswered               -> list_unanswered
/// GET    /mine/unresolved          -> list_my_unresolved
/// GET    /similar                  -> similar_questions (?title&body&threshold)
/// GET    /by-title                 -> get_by_title (?title)
/// GET    /{id}                     -> get_question
/// PUT    /{id}                     -> update_question
/// DELETE /{id}                     -> delete_question
/// GET    /{id}/answers             -> list_answers
/// POST   /{id}/answers             -> create_answer
/// GET    /{id}/potential-answers   -> potential_answers
/// GET    /{id}/thread              -> thread
/// GET    /{id}/preferred-answer    -> get_preferred_answer
/// PUT    /{id}/preferred-answer    -> set_preferred_answer
/// DELETE /{id}/preferred-answer    -> clear_preferred_answer
/// GET    /{id}/unread-count        -> unread_count
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/unresolved", get(questions::list_unresolved))
        .route("/answered", get(questions::list_answered))
        .route("/unanswered", get(questions::list_unanswered))
        .route("/mine/unresolved", get(questions::list_my_unresolved))
        .route("/similar", get(questions::similar_questions))
        .route("/by-title", get(questions::get_by_title))
        .route(
            "/{id}",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route(
            "/{id}/answers",
            get(questions::list_answers).post(questions::create_answer),
        )
        .route("/{id}/potential-answers", get(questions::potential_answers))
        .route("/{id}/thread", get(questions::thread))
        .route(
            "/{id}/preferred-answer",
            get(questions::get_preferred_answer)
                .put(questions::set_preferred_answer)
                .delete(questions::clear_preferred_answer),
        )
        .route("/{id}/unread-count", get(questions::unread_count))
}
