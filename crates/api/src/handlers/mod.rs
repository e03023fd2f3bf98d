pub mod answers;
pub mod me;
pub mod questions;
