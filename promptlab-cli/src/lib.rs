//! Command-line glue around the `promptlab` engines
//!
//! This crate loads technique parameters from JSON files and `key=value`
//! arguments, fills task prompt templates, reads TOML configuration, appends
//! runs to a JSONL log and renders console or JSON reports.
//!
//! # Example
//!
//! ```no_run
//! use promptlab::{evaluate_output, TechniqueRegistry};
//! use promptlab_cli::{
//!     loader::build_params,
//!     reporting::{render_run_report, RunLog, RunRecord},
//! };
//!
//! let registry = TechniqueRegistry::standard();
//! let params = build_params(None, Some(r#"{"task": "Add", "input_text": "2 + 2"}"#), &[] as &[&str]).unwrap();
//! let result = registry.apply("chain-of-thought", &params).unwrap();
//!
//! let output = "2 + 2 = 4";
//! let report = evaluate_output(output, Some("4"), None);
//! println!("{}", render_run_report(result.metadata.kind(), &result.prompt, output, &report));
//!
//! let record = RunRecord::success(result.metadata.kind(), &result, output);
//! RunLog::new("logs/prompt_engineering_runs.jsonl").append(&record).unwrap();
//! ```

pub mod comparator;
pub mod config;
pub mod loader;
pub mod reporting;
pub mod template;

pub use config::{Config, ReportFormat};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::comparator::{compare_techniques, CompareError, ComparisonMetric, TechniqueComparison};
    pub use crate::config::{Config, ConfigError, ReportFormat};
    pub use crate::loader::{build_params, load_params_from_file, parse_param_pairs, read_text, LoadError};
    pub use crate::reporting::{
        render_comparison, render_evaluation, render_prompt, render_run_report, render_tasks, render_template,
        RunLog, RunRecord, RunStatus,
    };
    pub use crate::template::{fill_template, list_tasks, load_templates, FilledTemplate, PromptTemplate};
}
