use thiserror::Error;

/// Errors produced by model constructors and input validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid {kind} id: '{value}'")]
    InvalidId { kind: &'static str, value: String },

    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("unknown movie rating '{0}'")]
    UnknownRating(String),

    #[error("unknown movie category '{0}'")]
    UnknownCategory(String),
}

impl ModelError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        ModelError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
