//! Reference-based text metrics

pub mod lexical;
pub mod ngram;
pub mod report;

pub use lexical::{keyword_presence, length_metrics, sentence_count, word_overlap, KeywordCoverage, LengthMetrics};
pub use ngram::{bleu, brevity_penalty, clipped_precisions, ngram_counts, NgramCount, OrderPrecision, MAX_ORDER};
pub use report::{evaluate, evaluate_with, EvaluationReport, Metric, MetricSelection, QualityBand};
