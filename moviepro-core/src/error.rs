use thiserror::Error;

use moviepro_model::ModelError;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Required input could not be parsed or failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or storage failure that is safe to retry.
    #[error("Transient error: {0}")]
    Transient(String),

    /// Uniqueness violation, e.g. a movie imported concurrently.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the caller may retry the operation with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transient(_) | CoreError::Cancelled(_))
    }

    /// Prefixes the message while keeping the error kind.
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            CoreError::Validation(m) => CoreError::Validation(format!("{context}: {m}")),
            CoreError::NotFound(m) => CoreError::NotFound(format!("{context}: {m}")),
            CoreError::Transient(m) => CoreError::Transient(format!("{context}: {m}")),
            CoreError::Conflict(m) => CoreError::Conflict(format!("{context}: {m}")),
            CoreError::Cancelled(m) => CoreError::Cancelled(format!("{context}: {m}")),
            CoreError::Internal(m) => CoreError::Internal(format!("{context}: {m}")),
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => CoreError::NotFound("row".to_string()),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => CoreError::Conflict(db.message().to_string()),
                Some(FOREIGN_KEY_VIOLATION) => CoreError::NotFound(db.message().to_string()),
                _ => CoreError::Internal(err.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => CoreError::Transient(err.to_string()),
            _ => CoreError::Internal(err.to_string()),
        }
    }
}

impl From<ModelError> for CoreError {
    fn from(err: ModelError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_and_cancelled_are_retryable() {
        assert!(CoreError::Transient("io".into()).is_retryable());
        assert!(CoreError::Cancelled("import".into()).is_retryable());
        assert!(!CoreError::NotFound("movie".into()).is_retryable());
        assert!(!CoreError::Conflict("tmdb_id".into()).is_retryable());
        assert!(!CoreError::Validation("date".into()).is_retryable());
    }

    #[test]
    fn context_keeps_the_kind() {
        let err = CoreError::Conflict("duplicate key".into()).context("Failed to insert movie");
        assert!(matches!(err, CoreError::Conflict(msg) if msg == "Failed to insert movie: duplicate key"));
    }

    #[test]
    fn pool_exhaustion_is_transient() {
        assert!(CoreError::from(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(matches!(
            CoreError::from(sqlx::Error::RowNotFound),
            CoreError::NotFound(_)
        ));
    }

    #[test]
    fn model_errors_become_validation_errors() {
        let err: CoreError = ModelError::invalid_field("title", "must not be blank").into();
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("title")));
    }
}
