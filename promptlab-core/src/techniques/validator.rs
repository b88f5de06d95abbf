//! Conversion of an untyped [`ParameterMap`] into [`TechniqueParams`]
//!
//! Checks run in stages and each stage reports every problem it finds:
//!
//! 1. required keys that are absent, `null` or blank strings;
//! 2. values of the wrong JSON type, required and optional alike;
//! 3. the few-shot example list (empty list, incomplete pairs, wrong types).
//!
//! Keys a technique does not read are ignored.

use serde_json::Value;
use tracing::debug;

use super::params::{
    ChainOfThoughtParams, Example, FewShotParams, MetaPromptParams, ParameterMap, SingleShotParams,
    TechniqueParams,
};
use super::{TechniqueKind, TechniqueSpec, ValueType};
use crate::error::{json_type_name, ConfigurationError, FieldProblem, MalformedInputError, Result};

pub fn validate(spec: &TechniqueSpec, params: &ParameterMap) -> Result<TechniqueParams> {
    for key in params.keys().filter(|key| !spec.accepts(key)) {
        debug!(technique = %spec.kind, key, "ignoring unused parameter");
    }

    let missing: Vec<String> = spec
        .required_names()
        .filter(|name| is_missing(params.get(name)))
        .map(String::from)
        .collect();
    if !missing.is_empty() {
        debug!(technique = %spec.kind, ?missing, "rejected: missing parameters");
        return Err(ConfigurationError::MissingParameters {
            technique: spec.kind,
            keys: missing,
        }
        .into());
    }

    let mut problems = Vec::new();
    for key in spec.required {
        if let Some(value) = params.get(key.name) {
            if !has_type(value, key.value_type) {
                problems.push(FieldProblem::new(
                    key.name,
                    key.value_type.json_name(),
                    json_type_name(value),
                ));
            }
        }
    }
    for key in spec.optional {
        match params.get(key.name) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(value) => problems.push(FieldProblem::new(key.name, "string", json_type_name(value))),
        }
    }
    if !problems.is_empty() {
        debug!(technique = %spec.kind, count = problems.len(), "rejected: wrongly typed parameters");
        return Err(MalformedInputError::InvalidFields(problems).into());
    }

    let typed = match spec.kind {
        TechniqueKind::SingleShot => TechniqueParams::SingleShot(SingleShotParams {
            task_description: text(params, "task_description"),
            example_input: text(params, "example_input"),
            example_output: text(params, "example_output"),
            actual_input: text(params, "actual_input"),
        }),
        TechniqueKind::MetaPrompting => TechniqueParams::MetaPrompting(MetaPromptParams {
            goal: text(params, "goal"),
            context: optional_text(spec, params, "context"),
            constraints: optional_text(spec, params, "constraints"),
            output_format: optional_text(spec, params, "output_format"),
        }),
        TechniqueKind::ChainOfThought => TechniqueParams::ChainOfThought(ChainOfThoughtParams {
            task: text(params, "task"),
            input_text: text(params, "input_text"),
        }),
        TechniqueKind::FewShot => TechniqueParams::FewShot(FewShotParams {
            task_description: text(params, "task_description"),
            examples: examples(spec.kind, params.get("examples"))?,
            actual_input: text(params, "actual_input"),
        }),
    };

    Ok(typed)
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn has_type(value: &Value, expected: ValueType) -> bool {
    match expected {
        ValueType::Text => value.is_string(),
        ValueType::ExampleList => value.is_array(),
    }
}

/// A required string that has already passed the presence and type checks.
fn text(params: &ParameterMap, key: &str) -> String {
    params
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_text(spec: &TechniqueSpec, params: &ParameterMap, key: &str) -> Option<String> {
    let given = params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty());

    match given {
        Some(s) => Some(s.to_string()),
        None => spec
            .optional
            .iter()
            .find(|optional| optional.name == key)
            .and_then(|optional| optional.default)
            .map(String::from),
    }
}

fn examples(technique: TechniqueKind, value: Option<&Value>) -> Result<Vec<Example>> {
    let items: &[Value] = match value {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };
    if items.is_empty() {
        debug!(%technique, "rejected: empty example list");
        return Err(ConfigurationError::EmptyExamples { technique }.into());
    }

    let mut incomplete = Vec::new();
    let mut problems = Vec::new();
    let mut examples = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let Value::Object(pair) = item else {
            problems.push(FieldProblem::new(
                format!("examples[{}]", i),
                "object",
                json_type_name(item),
            ));
            continue;
        };

        let mut field = |name: &str| -> Option<String> {
            let path = format!("examples[{}].{}", i, name);
            match pair.get(name) {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                Some(value) if !is_missing(Some(value)) => {
                    problems.push(FieldProblem::new(path, "string", json_type_name(value)));
                    None
                }
                _ => {
                    incomplete.push(path);
                    None
                }
            }
        };

        let input = field("input");
        let output = field("output");
        if let (Some(input), Some(output)) = (input, output) {
            examples.push(Example { input, output });
        }
    }

    if !incomplete.is_empty() {
        debug!(%technique, fields = ?incomplete, "rejected: incomplete examples");
        return Err(ConfigurationError::IncompleteExamples {
            technique,
            fields: incomplete,
        }
        .into());
    }
    if !problems.is_empty() {
        debug!(%technique, count = problems.len(), "rejected: malformed examples");
        return Err(MalformedInputError::InvalidFields(problems).into());
    }

    Ok(examples)
}
