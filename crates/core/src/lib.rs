//! Pure domain logic for the askboard Q&A core.
//!
//! Nothing in this crate touches the database: relation-list encoding,
//! text tokenization, Q&A predicates, input validation, and the
//! user-directory capability consumed by the stores.

pub mod error;
pub mod qa;
pub mod relation;
pub mod text_index;
pub mod types;
pub mod users;
