//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement operations open
//! their own transaction.

pub mod answer_repo;
pub mod question_repo;
pub mod read_mark_repo;
pub mod user_repo;

pub use answer_repo::AnswerRepo;
pub use question_repo::QuestionRepo;
pub use read_mark_repo::ReadMarkRepo;
pub use user_repo::UserRepo;
