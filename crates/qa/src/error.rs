use askboard_core::error::CoreError;
use askboard_core::types::DbId;

/// Unified error for every store and facade operation.
///
/// Not-found and validation failures arrive as [`CoreError`]; anything the
/// database reports is [`QaError::Storage`] and is never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type QaResult<T> = Result<T, QaError>;

impl QaError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QaError::Core(core) if core.is_not_found())
    }
}

pub(crate) fn not_found(entity: &'static str, id: DbId) -> QaError {
    QaError::Core(CoreError::NotFound { entity, id })
}
