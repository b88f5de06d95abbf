//! Human-readable reports

pub mod run_log;

pub use run_log::{RunLog, RunRecord, RunStatus};

use indexmap::IndexMap;
use promptlab::{EvaluationReport, PromptResult, TechniqueKind, TechniqueRegistry};

use crate::comparator::TechniqueComparison;
use crate::template::{FilledTemplate, PromptTemplate};

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// List every registered technique with its parameters
pub fn render_techniques(registry: &TechniqueRegistry) -> String {
    let mut out = String::new();
    out.push_str(&format!("Available Techniques ({}):\n", registry.len()));
    out.push_str(&format!("{:-<60}\n", ""));

    for spec in registry.specs() {
        out.push_str(&format!("  {} | {}\n", spec.kind, spec.name));
        out.push_str(&format!("      {}\n", spec.description));
        let required: Vec<&str> = spec.required_names().collect();
        out.push_str(&format!("      required: {}\n", required.join(", ")));
        if !spec.optional.is_empty() {
            let optional: Vec<&str> = spec.optional_names().collect();
            out.push_str(&format!("      optional: {}\n", optional.join(", ")));
        }
    }

    out
}

/// The generated prompt followed by its metadata
pub fn render_prompt(result: &PromptResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Generated Prompt ({}) ===\n\n", result.metadata.kind()));
    out.push_str(&result.prompt);
    out.push('\n');
    out.push_str(&format!("\n{:-<50}\n", ""));
    out.push_str("Metadata:\n");
    out.push_str(&format!("  technique: {}\n", result.metadata.kind()));

    if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(&result.metadata) {
        for (key, value) in fields.iter().filter(|(key, _)| key.as_str() != "technique") {
            match value {
                serde_json::Value::String(s) => out.push_str(&format!("  {}: {}\n", key, s)),
                other => out.push_str(&format!("  {}: {}\n", key, other)),
            }
        }
    }

    out
}

/// Metric section shared by the standalone and full run reports
pub fn render_evaluation(report: &EvaluationReport) -> String {
    let mut out = String::new();

    out.push_str("Output Statistics:\n");
    out.push_str(&format!("  - Word Count: {}\n", report.word_count));
    out.push_str(&format!("  - Character Count: {}\n", report.char_count));
    out.push_str(&format!("  - Sentence Count: {}\n", report.sentence_count));

    if let Some(score) = report.bleu_score {
        out.push_str(&format!("\nBLEU Score: {:.4}\n", score));
        if let Some(quality) = report.quality {
            out.push_str(&format!("  Quality: {}\n", quality));
        }
    }

    if let Some(overlap) = report.word_overlap {
        out.push_str(&format!("\nWord Overlap: {}\n", percent(overlap)));
    }

    if let Some(length) = &report.length_metrics {
        out.push_str("\nLength Comparison:\n");
        out.push_str(&format!("  - Candidate: {} words\n", length.candidate_words));
        out.push_str(&format!("  - Reference: {} words\n", length.reference_words));
        out.push_str(&format!("  - Ratio: {:.2}\n", length.ratio));
        out.push_str(&format!("  - Difference: {} words\n", length.difference));
    }

    let coverage = &report.keyword_coverage;
    if coverage.total() > 0 {
        out.push_str("\nKeyword Analysis:\n");
        out.push_str(&format!(
            "  - Coverage: {} ({}/{})\n",
            percent(coverage.coverage_pct),
            coverage.present.len(),
            coverage.total()
        ));
        if !coverage.missing.is_empty() {
            out.push_str(&format!("  - Missing: {}\n", coverage.missing.join(", ")));
        }
    }

    out
}

/// Full report for one technique run
pub fn render_run_report(
    technique: TechniqueKind,
    prompt: &str,
    output: &str,
    report: &EvaluationReport,
) -> String {
    let rule = format!("{:=<60}", "");
    let mut out = String::new();
    out.push_str(&format!("{}\nPROMPT ENGINEERING EVALUATION REPORT\n{}\n", rule, rule));
    out.push_str(&format!("\nTechnique: {}\n", technique));
    out.push_str(&format!("\nPrompt Length: {} characters\n", prompt.chars().count()));
    out.push_str(&format!("Output Length: {} characters\n", output.chars().count()));
    out.push_str(&format!("\n{:-<60}\nEVALUATION METRICS\n{:-<60}\n\n", "", ""));
    out.push_str(&render_evaluation(report));
    out.push_str(&format!("\n{}\n", rule));
    out
}

/// Ranking table for a technique comparison
pub fn render_comparison(comparison: &TechniqueComparison) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n=== Technique Comparison: {} ===\n\n", comparison.metric));

    out.push_str(&format!("Rankings:\n{:-<50}\n", ""));
    for (i, run) in comparison.rankings.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} (run #{}) - {:.4}\n",
            i + 1,
            run.technique,
            run.index + 1,
            run.value
        ));
    }

    out.push_str(&format!("\nAverages by Technique:\n{:-<50}\n", ""));
    for (technique, avg) in &comparison.averages_by_technique {
        out.push_str(&format!("  {}: {:.4}\n", technique, avg));
    }

    out.push_str(&format!(
        "\nBest: {} ({:.4})\n",
        comparison.best_technique, comparison.best_value
    ));
    out.push_str(&format!("Average: {:.4}\n", comparison.average));
    out.push_str(&format!("\n{:=<50}\n", ""));
    out
}

/// Every template of the listed tasks
pub fn render_tasks(tasks: &IndexMap<String, Vec<PromptTemplate>>) -> String {
    let mut out = String::new();
    out.push_str("Available Tasks:\n");
    out.push_str(&format!("{:-<60}\n", ""));

    for (task, templates) in tasks {
        for template in templates {
            out.push_str(&format!("  {} | {} | {}\n", task, template.prompt_type, template.name));
            for line in template.prompt.lines() {
                out.push_str(&format!("      {}\n", line));
            }
        }
    }

    out
}

/// A filled task template
pub fn render_template(filled: &FilledTemplate) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} ({} / {}) ===\n\n",
        filled.name, filled.task, filled.prompt_type
    ));
    out.push_str(&filled.prompt);
    out.push('\n');
    out
}
