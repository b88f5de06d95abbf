//! Aggregated evaluation of one candidate text

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::lexical::{keyword_presence, length_metrics, word_overlap, KeywordCoverage, LengthMetrics};
use super::ngram::bleu;
use crate::error::UnknownMetricError;
use crate::tokenizer::{split_sentences, tokenize};

/// Qualitative band for a BLEU score. Presentational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            QualityBand::Excellent
        } else if score >= 0.5 {
            QualityBand::Good
        } else if score >= 0.3 {
            QualityBand::Fair
        } else {
            QualityBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityBand::Excellent => "Excellent",
            QualityBand::Good => "Good",
            QualityBand::Fair => "Fair",
            QualityBand::Poor => "Poor",
        }
    }
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An optional metric group of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Bleu,
    WordOverlap,
    Length,
    Keywords,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Bleu, Metric::WordOverlap, Metric::Length, Metric::Keywords];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Bleu => "bleu",
            Metric::WordOverlap => "word_overlap",
            Metric::Length => "length",
            Metric::Keywords => "keywords",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "bleu" => Ok(Metric::Bleu),
            "word_overlap" => Ok(Metric::WordOverlap),
            "length" => Ok(Metric::Length),
            "keywords" => Ok(Metric::Keywords),
            _ => Err(UnknownMetricError(s.trim().to_string())),
        }
    }
}

/// Which optional metrics [`evaluate_with`] computes.
///
/// Output statistics are always computed. Parses from a comma-separated
/// list such as `"bleu,keywords"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSelection {
    metrics: Vec<Metric>,
}

impl MetricSelection {
    pub fn all() -> Self {
        Self::only(Metric::ALL)
    }

    pub fn none() -> Self {
        Self { metrics: Vec::new() }
    }

    pub fn only(metrics: impl IntoIterator<Item = Metric>) -> Self {
        let mut selection = Self::none();
        for metric in metrics {
            if !selection.contains(metric) {
                selection.metrics.push(metric);
            }
        }
        selection
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }
}

impl Default for MetricSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for MetricSelection {
    type Err = UnknownMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let metrics = s
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Metric>, _>>()?;
        Ok(Self::only(metrics))
    }
}

/// Metrics for one candidate, optionally against a reference.
///
/// Reference-dependent fields are `None` (and left out of the JSON form)
/// when no reference was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bleu_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_overlap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_metrics: Option<LengthMetrics>,
    #[serde(default)]
    pub keyword_coverage: KeywordCoverage,
    pub sentence_count: usize,
    pub word_count: usize,
    pub char_count: usize,
}

impl EvaluationReport {
    pub fn has_reference(&self) -> bool {
        self.bleu_score.is_some()
    }
}

/// Score `candidate` against an optional reference and keyword list.
///
/// Never fails: an empty candidate or reference produces zero scores.
pub fn evaluate(
    candidate: &str,
    reference: Option<&str>,
    keywords: Option<&[String]>,
) -> EvaluationReport {
    evaluate_with(candidate, reference, keywords, &MetricSelection::all())
}

/// Like [`evaluate`], computing only the metrics in `metrics`.
///
/// Unselected reference metrics are `None`; unselected keyword coverage is
/// vacuous.
pub fn evaluate_with(
    candidate: &str,
    reference: Option<&str>,
    keywords: Option<&[String]>,
    metrics: &MetricSelection,
) -> EvaluationReport {
    let candidate_tokens = tokenize(candidate);

    let mut report = EvaluationReport {
        bleu_score: None,
        quality: None,
        word_overlap: None,
        length_metrics: None,
        keyword_coverage: KeywordCoverage::vacuous(),
        sentence_count: split_sentences(candidate).len(),
        word_count: candidate_tokens.len(),
        char_count: candidate.chars().count(),
    };

    if let Some(reference) = reference {
        let reference_tokens = tokenize(reference);
        if metrics.contains(Metric::Bleu) {
            let score = bleu(&candidate_tokens, &reference_tokens);
            report.bleu_score = Some(score);
            report.quality = Some(QualityBand::from_score(score));
        }
        if metrics.contains(Metric::WordOverlap) {
            report.word_overlap = Some(word_overlap(&candidate_tokens, &reference_tokens));
        }
        if metrics.contains(Metric::Length) {
            report.length_metrics = Some(length_metrics(&candidate_tokens, &reference_tokens));
        }
    }

    if let Some(keywords) = keywords.filter(|k| !k.is_empty() && metrics.contains(Metric::Keywords)) {
        report.keyword_coverage = keyword_presence(candidate, keywords);
    }

    tracing::debug!(
        words = candidate_tokens.len(),
        has_reference = reference.is_some(),
        metrics = metrics.metrics().len(),
        "evaluated candidate"
    );

    report
}
