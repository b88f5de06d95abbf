//! Parameter and text loading from files and command-line arguments

use std::path::Path;

use promptlab::{MalformedInputError, ParameterMap};
use serde_json::Value;

/// Error type for parameter and template loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid parameters: {0}")]
    Params(#[from] MalformedInputError),

    #[error("Unknown task: {task}. Available tasks: {available}")]
    UnknownTask { task: String, available: String },

    #[error("Prompt type {prompt_type} not found for task {task}")]
    UnknownPromptType { task: String, prompt_type: String },
}

/// Load a parameter map from a JSON file holding one object
pub fn load_params_from_file(path: impl AsRef<Path>) -> Result<ParameterMap, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let params = ParameterMap::from_json_str(&content)?;
    tracing::debug!("Loaded {} parameter(s) from {}", params.len(), path.display());
    Ok(params)
}

/// Parse `key=value` pairs.
///
/// Values starting with `[` or `{` are parsed as JSON; everything else is
/// taken as a literal string.
pub fn parse_param_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<ParameterMap, LoadError> {
    let mut params = ParameterMap::new();

    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| LoadError::Parse(format!("expected key=value, got '{}'", pair)))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(LoadError::Parse(format!("empty key in '{}'", pair)));
        }

        let trimmed = value.trim_start();
        let value = if trimmed.starts_with('[') || trimmed.starts_with('{') {
            serde_json::from_str(trimmed)
                .map_err(|e| LoadError::Parse(format!("value of '{}' is not valid JSON: {}", key, e)))?
        } else {
            Value::String(value.to_string())
        };

        params.insert(key, value);
    }

    Ok(params)
}

/// Merge parameters from a file, an inline JSON object and `key=value` pairs.
///
/// Later sources override keys from earlier ones.
pub fn build_params<S: AsRef<str>>(
    file: Option<&Path>,
    inline_json: Option<&str>,
    pairs: &[S],
) -> Result<ParameterMap, LoadError> {
    let mut params = match file {
        Some(path) => load_params_from_file(path)?,
        None => ParameterMap::new(),
    };

    if let Some(json) = inline_json {
        params.merge(ParameterMap::from_json_str(json)?);
    }

    params.merge(parse_param_pairs(pairs)?);
    Ok(params)
}

/// Text given inline or read from a file; inline wins when both are present
pub fn read_text(inline: Option<&str>, file: Option<&Path>) -> Result<Option<String>, LoadError> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text.to_string())),
        (None, Some(path)) => Ok(Some(std::fs::read_to_string(path)?)),
        (None, None) => Ok(None),
    }
}

/// Split a comma-separated keyword list, dropping blank entries
pub fn parse_keywords(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_param_pairs() {
        let params = parse_param_pairs(&[
            "goal=Write a haiku",
            "examples=[{\"input\": \"a\", \"output\": \"b\"}]",
            "note=a=b",
        ])
        .unwrap();
        assert_eq!(params.get("goal"), Some(&json!("Write a haiku")));
        assert_eq!(params.get("examples"), Some(&json!([{"input": "a", "output": "b"}])));
        assert_eq!(params.get("note"), Some(&json!("a=b")));
    }

    #[test]
    fn test_parse_param_pairs_rejects_missing_separator() {
        let err = parse_param_pairs(&["goal"]).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(parse_param_pairs(&["=value"]).is_err());
    }

    #[test]
    fn test_parse_param_pairs_rejects_bad_json() {
        let err = parse_param_pairs(&["examples=[oops"]).unwrap_err();
        assert!(err.to_string().contains("examples"));
    }

    #[test]
    fn test_build_params_later_sources_win() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"goal": "from file", "context": "file context"}}"#).unwrap();

        let params = build_params(
            Some(file.path()),
            Some(r#"{"goal": "from json", "constraints": "short"}"#),
            &["constraints=very short"],
        )
        .unwrap();

        assert_eq!(params.get("goal"), Some(&json!("from json")));
        assert_eq!(params.get("context"), Some(&json!("file context")));
        assert_eq!(params.get("constraints"), Some(&json!("very short")));
    }

    #[test]
    fn test_load_params_from_file_requires_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        let err = load_params_from_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Params(MalformedInputError::NotAnObject("array"))));
    }

    #[test]
    fn test_load_params_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_params_from_file(dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_read_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "from file").unwrap();

        assert_eq!(read_text(Some("inline"), Some(file.path())).unwrap().as_deref(), Some("inline"));
        assert_eq!(read_text(None, Some(file.path())).unwrap().as_deref(), Some("from file"));
        assert_eq!(read_text(None, None).unwrap(), None);
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords(" Bonjour, journée ,, "), vec!["Bonjour", "journée"]);
        assert!(parse_keywords("").is_empty());
    }
}
