use crate::types::DbId;

/// Domain errors raised by topic and tree-import logic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The entity does not exist or is not visible to the caller.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Rejected input. The message names the offending field or tree index.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing, malformed, or expired access token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
