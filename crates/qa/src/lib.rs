//! Q&A stores and facade.
//!
//! [`QuestionStore`], [`AnswerStore`] and [`ReadTracker`] wrap the
//! repositories with input validation, error translation and view
//! composition (author display names, token sets, unread counts).
//! [`QaFacade`] bundles them into the API external callers use.

pub mod answers;
pub mod error;
pub mod facade;
pub mod questions;
pub mod read_tracking;
pub mod views;

pub use answers::AnswerStore;
pub use error::{QaError, QaResult};
pub use facade::QaFacade;
pub use questions::QuestionStore;
pub use read_tracking::ReadTracker;
