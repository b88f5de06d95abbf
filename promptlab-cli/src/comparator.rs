//! Cross-technique comparison over logged runs

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use promptlab::{EvaluationReport, TechniqueKind};
use serde::{Deserialize, Serialize};

use crate::reporting::run_log::RunRecord;

/// Error type for technique comparison
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompareError {
    #[error("No results to compare")]
    NoResults,

    #[error("Metric '{0}' not found in results")]
    MetricNotFound(ComparisonMetric),

    #[error("Unknown metric '{0}'. Supported metrics: bleu_score, word_overlap, length_ratio, keyword_coverage")]
    UnknownMetric(String),
}

/// Evaluation value runs are ranked by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ComparisonMetric {
    #[default]
    BleuScore,
    WordOverlap,
    LengthRatio,
    KeywordCoverage,
}

impl ComparisonMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMetric::BleuScore => "bleu_score",
            ComparisonMetric::WordOverlap => "word_overlap",
            ComparisonMetric::LengthRatio => "length_ratio",
            ComparisonMetric::KeywordCoverage => "keyword_coverage",
        }
    }

    pub fn all() -> [ComparisonMetric; 4] {
        [
            ComparisonMetric::BleuScore,
            ComparisonMetric::WordOverlap,
            ComparisonMetric::LengthRatio,
            ComparisonMetric::KeywordCoverage,
        ]
    }

    /// The metric's value in `report`, if that report carries it.
    ///
    /// Keyword coverage only counts when keywords were actually checked.
    pub fn value(&self, report: &EvaluationReport) -> Option<f64> {
        match self {
            ComparisonMetric::BleuScore => report.bleu_score,
            ComparisonMetric::WordOverlap => report.word_overlap,
            ComparisonMetric::LengthRatio => report.length_metrics.map(|m| m.ratio),
            ComparisonMetric::KeywordCoverage => {
                let coverage = &report.keyword_coverage;
                (coverage.total() > 0).then_some(coverage.coverage_pct)
            }
        }
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMetric {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ComparisonMetric::all()
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| CompareError::UnknownMetric(s.to_string()))
    }
}

/// One ranked run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRun {
    /// Position of the run in the log
    pub index: usize,
    pub technique: TechniqueKind,
    pub value: f64,
}

/// Result of comparing runs on one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueComparison {
    pub metric: ComparisonMetric,
    pub best_technique: TechniqueKind,
    pub best_value: f64,
    pub rankings: Vec<RankedRun>,
    pub average: f64,
    pub averages_by_technique: IndexMap<TechniqueKind, f64>,
}

/// Rank successful runs by `metric`, best first.
///
/// Runs that failed or whose evaluation lacks the metric are left out. Ties
/// keep log order.
pub fn compare_techniques(
    records: &[RunRecord],
    metric: ComparisonMetric,
) -> Result<TechniqueComparison, CompareError> {
    if records.is_empty() {
        return Err(CompareError::NoResults);
    }

    let mut rankings: Vec<RankedRun> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_success())
        .filter_map(|(index, record)| {
            let value = metric.value(record.evaluation.as_ref()?)?;
            Some(RankedRun {
                index,
                technique: record.technique,
                value,
            })
        })
        .collect();

    if rankings.is_empty() {
        return Err(CompareError::MetricNotFound(metric));
    }

    // Sort by value descending
    rankings.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let average = rankings.iter().map(|r| r.value).sum::<f64>() / rankings.len() as f64;

    let mut grouped: IndexMap<TechniqueKind, Vec<f64>> = IndexMap::new();
    for run in &rankings {
        grouped.entry(run.technique).or_default().push(run.value);
    }
    let averages_by_technique = grouped
        .into_iter()
        .map(|(technique, values)| {
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            (technique, avg)
        })
        .collect();

    let best = &rankings[0];
    Ok(TechniqueComparison {
        metric,
        best_technique: best.technique,
        best_value: best.value,
        average,
        averages_by_technique,
        rankings,
    })
}
