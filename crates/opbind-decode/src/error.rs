use opbind_core::value::ValueType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Per-call decode failures. `name` is the full argument path, e.g.
/// `columns.name` or `values[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing required argument '{name}'")]
    MissingArgument { name: String },

    #[error("argument '{name}': expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: String,
        got: ValueType,
    },

    #[error("unexpected argument '{name}'")]
    UnexpectedArgument { name: String },

    /// A stream went somewhere other than a stream field, or a stream field
    /// got something else.
    #[error("argument '{name}': invalid dependency, expected {expected}, got {got}")]
    InvalidDependency {
        name: String,
        expected: String,
        got: ValueType,
    },

    #[error("argument '{name}': nesting exceeds {limit} levels")]
    TooDeep { name: String, limit: usize },

    /// The record's `from_fields` disagrees with its own shape.
    #[error("internal decode error: {0}")]
    Internal(String),
}

impl DecodeError {
    /// Argument path the error refers to, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            DecodeError::MissingArgument { name }
            | DecodeError::TypeMismatch { name, .. }
            | DecodeError::UnexpectedArgument { name }
            | DecodeError::InvalidDependency { name, .. }
            | DecodeError::TooDeep { name, .. } => Some(name),
            DecodeError::Internal(_) => None,
        }
    }
}
