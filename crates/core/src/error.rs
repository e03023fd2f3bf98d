use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: {entity} with {field} '{value}'")]
    NotFoundBy {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// True for both id-keyed and field-keyed lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. } | CoreError::NotFoundBy { .. })
    }
}
