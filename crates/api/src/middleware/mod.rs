//! Request extractors.
//!
//! - [`user::RequestUser`] -- The calling user, from the `x-user-id` header.

pub mod user;
