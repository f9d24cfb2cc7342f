use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No entity with the given identity exists.
    #[error("entity not found: {id}")]
    NotFound { id: String },

    /// Backend-specific failure outside the common taxonomy.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl RepositoryError {
    /// Convenience constructor for [`RepositoryError::NotFound`].
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}
