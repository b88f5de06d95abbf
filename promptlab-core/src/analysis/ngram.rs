//! Clipped n-gram precision and the BLEU-style similarity score
//!
//! This is a single-sentence approximation, not corpus BLEU:
//!
//! - orders `1..=MAX_ORDER` the candidate is too short for are left out of
//!   the geometric mean instead of counting as zero;
//! - if no order has a single clipped match the score is `0.0`;
//! - otherwise an order with zero matches contributes `1 / (len + 1)`
//!   (Chen & Cherry add-one style) so one missing trigram does not wipe out
//!   the whole score.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Highest n-gram order considered by [`bleu`].
pub const MAX_ORDER: usize = 4;

/// Occurrence count of each n-gram in one token sequence.
pub type NgramCount<'a> = HashMap<&'a [String], usize>;

/// Clipped precision inputs for a single n-gram order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPrecision {
    pub order: usize,
    /// Candidate n-grams matched in the reference, clipped per n-gram.
    pub matches: usize,
    /// Total candidate n-grams of this order.
    pub total: usize,
}

impl OrderPrecision {
    pub fn precision(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matches as f64 / self.total as f64
        }
    }
}

/// Count every n-gram of length `n` in `tokens`.
pub fn ngram_counts(tokens: &[String], n: usize) -> NgramCount<'_> {
    let mut counts = NgramCount::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Clipped precision for every order the candidate is long enough for.
pub fn clipped_precisions(candidate: &[String], reference: &[String]) -> Vec<OrderPrecision> {
    (1..=MAX_ORDER.min(candidate.len()))
        .map(|order| {
            let candidate_counts = ngram_counts(candidate, order);
            let reference_counts = ngram_counts(reference, order);

            let matches = candidate_counts
                .iter()
                .map(|(ngram, &count)| {
                    let in_reference = reference_counts.get(ngram).copied().unwrap_or(0);
                    count.min(in_reference)
                })
                .sum();

            OrderPrecision {
                order,
                matches,
                total: candidate.len() - order + 1,
            }
        })
        .collect()
}

/// Penalty for candidates shorter than the reference.
///
/// `candidate_len` must be non-zero when it is shorter than the reference;
/// [`bleu`] handles the empty candidate before calling this.
pub fn brevity_penalty(candidate_len: usize, reference_len: usize) -> f64 {
    if candidate_len >= reference_len {
        1.0
    } else if candidate_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}

/// BLEU-style similarity between a candidate and a reference, in `[0, 1]`.
pub fn bleu(candidate: &[String], reference: &[String]) -> f64 {
    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let precisions = clipped_precisions(candidate, reference);
    if precisions.iter().all(|p| p.matches == 0) {
        return 0.0;
    }

    let floor = 1.0 / (candidate.len() + 1) as f64;
    let log_sum: f64 = precisions
        .iter()
        .map(|p| {
            if p.matches == 0 {
                floor.ln()
            } else {
                p.precision().ln()
            }
        })
        .sum();
    let geometric_mean = (log_sum / precisions.len() as f64).exp();

    let score = brevity_penalty(candidate.len(), reference.len()) * geometric_mean;
    score.clamp(0.0, 1.0)
}
