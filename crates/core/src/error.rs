use crate::types::DbId;

/// Domain-level error taxonomy shared by the service and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique column (`email`, `user_name`) already holds the submitted value.
    #[error("Unique constraint violated on {field}")]
    UniqueConstraint { field: &'static str },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
