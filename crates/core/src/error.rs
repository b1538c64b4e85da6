use crate::types::DbId;

/// Domain error shared by the engine, the store ports and the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Only raised by the `(code, version)` uniqueness guard on templates.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn template_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "FormTemplate",
            id,
        }
    }

    pub fn field_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "TemplateField",
            id,
        }
    }

    pub fn answer_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "FieldAnswer",
            id,
        }
    }
}

/// Convenience alias used by the store ports and the engine.
pub type CoreResult<T> = Result<T, CoreError>;
