//! Error types for technique application

use std::fmt;

use thiserror::Error;

use crate::techniques::TechniqueKind;

/// Errors raised while turning a parameter map into a prompt.
///
/// Scoring never fails, so every variant originates from technique lookup
/// or parameter validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInputError),
}

impl Error {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::MalformedInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A required parameter is absent, or a technique cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Unsupported technique: {id}. Supported techniques: {supported}")]
    UnknownTechnique { id: String, supported: String },

    #[error("{technique} requires missing or empty parameter(s): {}", .keys.join(", "))]
    MissingParameters {
        technique: TechniqueKind,
        keys: Vec<String>,
    },

    #[error("{technique} requires at least one example")]
    EmptyExamples { technique: TechniqueKind },

    #[error("{technique} examples are missing field(s): {}", .fields.join(", "))]
    IncompleteExamples {
        technique: TechniqueKind,
        fields: Vec<String>,
    },
}

impl ConfigurationError {
    /// Every parameter path this error refers to.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ConfigurationError::UnknownTechnique { .. } => Vec::new(),
            ConfigurationError::MissingParameters { keys, .. } => {
                keys.iter().map(String::as_str).collect()
            }
            ConfigurationError::EmptyExamples { .. } => vec!["examples"],
            ConfigurationError::IncompleteExamples { fields, .. } => {
                fields.iter().map(String::as_str).collect()
            }
        }
    }
}

/// Parameter values that are present but have the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Parameters must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("{}", FieldProblems(.0))]
    InvalidFields(Vec<FieldProblem>),
}

/// One wrongly typed parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProblem {
    pub field: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl FieldProblem {
    pub fn new(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self {
            field: field.into(),
            expected,
            found,
        }
    }
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (expected {}, found {})", self.field, self.expected, self.found)
    }
}

struct FieldProblems<'a>(&'a [FieldProblem]);

impl fmt::Display for FieldProblems<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("wrongly typed parameter(s): ")?;
        for (i, problem) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", problem)?;
        }
        Ok(())
    }
}

/// A metric name outside `bleu`, `word_overlap`, `length` and `keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown metric: {0}. Supported metrics: bleu, word_overlap, length, keywords")]
pub struct UnknownMetricError(pub String);

/// Name of a JSON value's type, as used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message_lists_every_key() {
        let err = ConfigurationError::MissingParameters {
            technique: TechniqueKind::SingleShot,
            keys: vec!["example_input".to_string(), "example_output".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "single-shot requires missing or empty parameter(s): example_input, example_output"
        );
        assert_eq!(err.fields(), vec!["example_input", "example_output"]);
    }

    #[test]
    fn test_invalid_fields_message() {
        let err = MalformedInputError::InvalidFields(vec![
            FieldProblem::new("goal", "string", "number"),
            FieldProblem::new("examples[1]", "object", "string"),
        ]);
        assert_eq!(
            err.to_string(),
            "wrongly typed parameter(s): goal (expected string, found number), examples[1] (expected object, found string)"
        );
    }

    #[test]
    fn test_error_kind_predicates() {
        let config: Error = ConfigurationError::EmptyExamples {
            technique: TechniqueKind::FewShot,
        }
        .into();
        assert!(config.is_configuration());
        assert!(!config.is_malformed_input());

        let malformed: Error = MalformedInputError::NotAnObject("array").into();
        assert!(malformed.is_malformed_input());
        assert_eq!(
            malformed.to_string(),
            "Malformed input: Parameters must be a JSON object, got array"
        );
    }
}
