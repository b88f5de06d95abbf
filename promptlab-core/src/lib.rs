//! promptlab - Prompt construction techniques and output scoring
//!
//! Two engines: technique application turns a technique identifier and a
//! parameter map into a deterministic prompt, and evaluation scores a model's
//! output against an optional reference text and keyword list.
//!
//! # Example
//!
//! ```rust
//! use promptlab::{apply_technique, evaluate_output, ParameterMap, TechniqueRegistry};
//!
//! let registry = TechniqueRegistry::standard();
//! let params = ParameterMap::new()
//!     .with("task_description", "Translate English to French")
//!     .with("example_input", "Hello")
//!     .with("example_output", "Bonjour")
//!     .with("actual_input", "Good morning");
//!
//! let result = apply_technique(&registry, "single-shot", &params).unwrap();
//! assert!(result.prompt.ends_with("Input: Good morning\nOutput:"));
//!
//! let keywords = vec!["Bonjour".to_string()];
//! let report = evaluate_output("Bonjour!", Some("Bonjour"), Some(&keywords));
//! assert_eq!(report.bleu_score, Some(1.0));
//! ```

pub mod analysis;
pub mod error;
pub mod techniques;
pub mod tokenizer;

pub use analysis::{EvaluationReport, KeywordCoverage, LengthMetrics, Metric, MetricSelection, QualityBand};
pub use error::{ConfigurationError, Error, FieldProblem, MalformedInputError, Result, UnknownMetricError};
pub use techniques::{
    Example, ParameterMap, PromptMetadata, PromptResult, TechniqueKind, TechniqueParams, TechniqueRegistry,
    TechniqueSpec,
};

/// Validate `params` for the technique named `technique_id` and render its prompt.
pub fn apply_technique(
    registry: &TechniqueRegistry,
    technique_id: &str,
    params: &ParameterMap,
) -> Result<PromptResult> {
    registry.apply(technique_id, params)
}

/// Score a candidate text. See [`analysis::evaluate`].
pub fn evaluate_output(
    candidate: &str,
    reference: Option<&str>,
    keywords: Option<&[String]>,
) -> EvaluationReport {
    analysis::evaluate(candidate, reference, keywords)
}

/// Score a candidate text, computing only the selected metrics. See [`analysis::evaluate_with`].
pub fn evaluate_output_with(
    candidate: &str,
    reference: Option<&str>,
    keywords: Option<&[String]>,
    metrics: &MetricSelection,
) -> EvaluationReport {
    analysis::evaluate_with(candidate, reference, keywords, metrics)
}
