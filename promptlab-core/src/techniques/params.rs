//! Untyped parameter maps and the typed records they validate into

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{json_type_name, MalformedInputError};

/// Ordered key/value parameters for one technique invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap(IndexMap<String, Value>);

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document that must be an object.
    pub fn from_json_str(json: &str) -> Result<Self, MalformedInputError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| MalformedInputError::InvalidJson(e.to_string()))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, MalformedInputError> {
        match value {
            Value::Object(object) => Ok(Self(object.into_iter().collect())),
            other => Err(MalformedInputError::NotAnObject(json_type_name(&other))),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Copy every entry of `other` over this map.
    pub fn merge(&mut self, other: ParameterMap) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParameterMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleShotParams {
    pub task_description: String,
    pub example_input: String,
    pub example_output: String,
    pub actual_input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaPromptParams {
    pub goal: String,
    pub context: Option<String>,
    pub constraints: Option<String>,
    pub output_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOfThoughtParams {
    pub task: String,
    pub input_text: String,
}

/// One demonstration pair for few-shot prompting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShotParams {
    pub task_description: String,
    pub examples: Vec<Example>,
    pub actual_input: String,
}

/// Validated parameters, one variant per technique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TechniqueParams {
    SingleShot(SingleShotParams),
    MetaPrompting(MetaPromptParams),
    ChainOfThought(ChainOfThoughtParams),
    FewShot(FewShotParams),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_str_preserves_order() {
        let params = ParameterMap::from_json_str(r#"{"b": "2", "a": "1", "c": [1]}"#).unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(params.get("a"), Some(&json!("1")));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_from_json_str_rejects_invalid_json() {
        let err = ParameterMap::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, MalformedInputError::InvalidJson(_)));
    }

    #[test]
    fn test_from_json_value_rejects_non_objects() {
        let err = ParameterMap::from_json_value(json!(["a"])).unwrap_err();
        assert_eq!(err, MalformedInputError::NotAnObject("array"));
    }

    #[test]
    fn test_merge_overrides_existing_keys() {
        let mut base = ParameterMap::new().with("goal", "old").with("context", "kept");
        base.merge(ParameterMap::new().with("goal", "new").with("constraints", "added"));
        assert_eq!(base.get("goal"), Some(&json!("new")));
        assert_eq!(base.keys().collect::<Vec<_>>(), vec!["goal", "context", "constraints"]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let params = ParameterMap::new().with("task", "t").with("n", 3);
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"task":"t","n":3}"#);
    }
}
