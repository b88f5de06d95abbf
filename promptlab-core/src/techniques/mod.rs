//! Prompt construction techniques
//!
//! A [`TechniqueRegistry`] maps technique identifiers to static
//! [`TechniqueSpec`]s. Applying a technique runs the parameter map through
//! [`validator::validate`] into a typed [`TechniqueParams`], then renders it
//! with [`format::render`].

pub mod format;
pub mod params;
pub mod validator;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

pub use format::{PromptMetadata, PromptResult};
pub use params::{
    ChainOfThoughtParams, Example, FewShotParams, MetaPromptParams, ParameterMap, SingleShotParams,
    TechniqueParams,
};

/// The closed set of supported techniques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechniqueKind {
    SingleShot,
    MetaPrompting,
    ChainOfThought,
    FewShot,
}

impl TechniqueKind {
    pub const ALL: [TechniqueKind; 4] = [
        TechniqueKind::SingleShot,
        TechniqueKind::MetaPrompting,
        TechniqueKind::ChainOfThought,
        TechniqueKind::FewShot,
    ];

    pub fn all() -> &'static [TechniqueKind] {
        &Self::ALL
    }

    /// Canonical identifier, e.g. `"chain-of-thought"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TechniqueKind::SingleShot => "single-shot",
            TechniqueKind::MetaPrompting => "meta-prompting",
            TechniqueKind::ChainOfThought => "chain-of-thought",
            TechniqueKind::FewShot => "few-shot",
        }
    }

    pub fn spec(&self) -> &'static TechniqueSpec {
        match self {
            TechniqueKind::SingleShot => &SINGLE_SHOT,
            TechniqueKind::MetaPrompting => &META_PROMPTING,
            TechniqueKind::ChainOfThought => &CHAIN_OF_THOUGHT,
            TechniqueKind::FewShot => &FEW_SHOT,
        }
    }
}

impl fmt::Display for TechniqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechniqueKind {
    type Err = ConfigurationError;

    /// Accepts the canonical identifiers and their underscore spellings,
    /// case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        TechniqueKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownTechnique {
                id: s.to_string(),
                supported: supported_list(TechniqueKind::ALL.iter()),
            })
    }
}

fn supported_list<'a>(kinds: impl Iterator<Item = &'a TechniqueKind>) -> String {
    kinds.map(TechniqueKind::as_str).collect::<Vec<_>>().join(", ")
}

/// Shape a required parameter value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// A non-blank string.
    Text,
    /// A non-empty array of `{input, output}` objects.
    ExampleList,
}

impl ValueType {
    pub fn json_name(&self) -> &'static str {
        match self {
            ValueType::Text => "string",
            ValueType::ExampleList => "array",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredKey {
    pub name: &'static str,
    pub value_type: ValueType,
}

/// Optional string parameter. A blank value counts as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionalKey {
    pub name: &'static str,
    pub default: Option<&'static str>,
}

/// Static description of one technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TechniqueSpec {
    pub kind: TechniqueKind,
    pub name: &'static str,
    pub description: &'static str,
    pub required: &'static [RequiredKey],
    pub optional: &'static [OptionalKey],
}

impl TechniqueSpec {
    pub fn required_names(&self) -> impl Iterator<Item = &'static str> {
        self.required.iter().map(|key| key.name)
    }

    pub fn optional_names(&self) -> impl Iterator<Item = &'static str> {
        self.optional.iter().map(|key| key.name)
    }

    /// Whether `key` is a parameter this technique reads.
    pub fn accepts(&self, key: &str) -> bool {
        self.required_names().chain(self.optional_names()).any(|name| name == key)
    }
}

const fn text(name: &'static str) -> RequiredKey {
    RequiredKey {
        name,
        value_type: ValueType::Text,
    }
}

static SINGLE_SHOT: TechniqueSpec = TechniqueSpec {
    kind: TechniqueKind::SingleShot,
    name: "Single-shot prompting",
    description: "Guides the model with one input/output demonstration before the actual input",
    required: &[
        text("task_description"),
        text("example_input"),
        text("example_output"),
        text("actual_input"),
    ],
    optional: &[],
};

static META_PROMPTING: TechniqueSpec = TechniqueSpec {
    kind: TechniqueKind::MetaPrompting,
    name: "Meta-prompting",
    description: "Asks the model to write an optimized prompt for a stated goal",
    required: &[text("goal")],
    optional: &[
        OptionalKey {
            name: "context",
            default: None,
        },
        OptionalKey {
            name: "constraints",
            default: None,
        },
        OptionalKey {
            name: "output_format",
            default: None,
        },
    ],
};

static CHAIN_OF_THOUGHT: TechniqueSpec = TechniqueSpec {
    kind: TechniqueKind::ChainOfThought,
    name: "Chain-of-thought prompting",
    description: "Asks the model to reason step by step before answering",
    required: &[text("task"), text("input_text")],
    optional: &[],
};

static FEW_SHOT: TechniqueSpec = TechniqueSpec {
    kind: TechniqueKind::FewShot,
    name: "Few-shot prompting",
    description: "Guides the model with several numbered demonstrations before the actual input",
    required: &[
        text("task_description"),
        RequiredKey {
            name: "examples",
            value_type: ValueType::ExampleList,
        },
        text("actual_input"),
    ],
    optional: &[],
};

/// Immutable set of techniques available to callers.
#[derive(Debug, Clone)]
pub struct TechniqueRegistry {
    specs: IndexMap<TechniqueKind, &'static TechniqueSpec>,
}

impl TechniqueRegistry {
    /// Registry restricted to `kinds`, in the given order. Duplicates are ignored.
    pub fn new(kinds: impl IntoIterator<Item = TechniqueKind>) -> Self {
        let specs = kinds.into_iter().map(|kind| (kind, kind.spec())).collect();
        Self { specs }
    }

    /// Registry with every technique.
    pub fn standard() -> Self {
        Self::new(TechniqueKind::ALL)
    }

    pub fn spec(&self, kind: TechniqueKind) -> Option<&'static TechniqueSpec> {
        self.specs.get(&kind).copied()
    }

    pub fn specs(&self) -> impl Iterator<Item = &'static TechniqueSpec> + '_ {
        self.specs.values().copied()
    }

    pub fn kinds(&self) -> impl Iterator<Item = TechniqueKind> + '_ {
        self.specs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Look up a technique identifier among the registered techniques.
    pub fn resolve(&self, id: &str) -> std::result::Result<&'static TechniqueSpec, ConfigurationError> {
        let unknown = || ConfigurationError::UnknownTechnique {
            id: id.to_string(),
            supported: supported_list(self.specs.keys()),
        };
        let kind: TechniqueKind = id.parse().map_err(|_| unknown())?;
        self.spec(kind).ok_or_else(unknown)
    }

    /// Validate `params` for technique `id` and render its prompt.
    pub fn apply(&self, id: &str, params: &ParameterMap) -> Result<PromptResult> {
        let spec = self.resolve(id)?;
        let typed = validator::validate(spec, params)?;
        let result = format::render(&typed);
        tracing::debug!(
            technique = %spec.kind,
            prompt_chars = result.prompt.chars().count(),
            "rendered prompt"
        );
        Ok(result)
    }
}

impl Default for TechniqueRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
