use thiserror::Error;

use crate::schema::ValidationResult;

/// Raised while turning field descriptors into a [`crate::schema::ValidationSchema`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Field name '{0}' is used more than once")]
    DuplicateField(String),

    #[error("Field name must not be empty")]
    EmptyName,
}

impl SchemaError {
    /// Name of the offending field, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::InvalidPattern { field, .. } => Some(field),
            SchemaError::DuplicateField(field) => Some(field),
            SchemaError::EmptyName => None,
        }
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Every problem found in an agent definition, in discovery order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid agent definition: {}", .0.join("; "))]
pub struct AgentError(pub Vec<String>);

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Submitted inputs are invalid: {}", describe_invalid(.0))]
    Invalid(ValidationResult),

    #[error("Failed to save inputs {fields:?}: {source}")]
    Sink {
        fields: Vec<String>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn describe_invalid(result: &ValidationResult) -> String {
    result
        .errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ")
}
