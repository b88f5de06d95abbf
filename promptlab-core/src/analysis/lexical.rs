//! Word-level metrics that ignore n-gram structure

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tokenizer::split_sentences;

/// Word counts of a candidate and its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthMetrics {
    pub candidate_words: usize,
    pub reference_words: usize,
    /// `candidate_words / reference_words`, or `0.0` for an empty reference
    pub ratio: f64,
    pub difference: usize,
}

/// Which required keywords a candidate mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCoverage {
    pub present: Vec<String>,
    pub missing: Vec<String>,
    pub coverage_pct: f64,
}

impl KeywordCoverage {
    /// Coverage for an empty keyword list: trivially complete.
    pub fn vacuous() -> Self {
        Self {
            present: Vec::new(),
            missing: Vec::new(),
            coverage_pct: 1.0,
        }
    }

    pub fn total(&self) -> usize {
        self.present.len() + self.missing.len()
    }
}

impl Default for KeywordCoverage {
    fn default() -> Self {
        Self::vacuous()
    }
}

/// Share of distinct reference tokens that also appear in the candidate.
pub fn word_overlap(candidate: &[String], reference: &[String]) -> f64 {
    let reference_set: HashSet<&str> = reference.iter().map(String::as_str).collect();
    if reference_set.is_empty() {
        return 0.0;
    }
    let candidate_set: HashSet<&str> = candidate.iter().map(String::as_str).collect();

    let shared = candidate_set.intersection(&reference_set).count();
    (shared as f64 / reference_set.len() as f64).clamp(0.0, 1.0)
}

pub fn length_metrics(candidate: &[String], reference: &[String]) -> LengthMetrics {
    let candidate_words = candidate.len();
    let reference_words = reference.len();
    let ratio = if reference_words == 0 {
        0.0
    } else {
        candidate_words as f64 / reference_words as f64
    };

    LengthMetrics {
        candidate_words,
        reference_words,
        ratio,
        difference: candidate_words.abs_diff(reference_words),
    }
}

/// Case-insensitive containment check of each keyword in the candidate text.
///
/// Blank keywords and case-insensitive duplicates are skipped; the first
/// spelling of a keyword is the one reported.
pub fn keyword_presence<S: AsRef<str>>(candidate: &str, keywords: &[S]) -> KeywordCoverage {
    let haystack = candidate.to_lowercase();
    let mut seen = HashSet::new();
    let mut present = Vec::new();
    let mut missing = Vec::new();

    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            continue;
        }
        let needle = keyword.to_lowercase();
        if !seen.insert(needle.clone()) {
            continue;
        }

        if haystack.contains(&needle) {
            present.push(keyword.to_string());
        } else {
            missing.push(keyword.to_string());
        }
    }

    let total = present.len() + missing.len();
    if total == 0 {
        return KeywordCoverage::vacuous();
    }

    let coverage_pct = present.len() as f64 / total as f64;
    KeywordCoverage {
        present,
        missing,
        coverage_pct,
    }
}

pub fn sentence_count(text: &str) -> usize {
    split_sentences(text).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_word_overlap_counts_distinct_reference_words() {
        let candidate = tokenize("the fox the fox");
        let reference = tokenize("the quick fox jumps");
        assert_eq!(word_overlap(&candidate, &reference), 0.5);
    }

    #[test]
    fn test_word_overlap_superset_is_one() {
        let candidate = tokenize("a quick brown fox jumps high");
        let reference = tokenize("fox jumps");
        assert_eq!(word_overlap(&candidate, &reference), 1.0);
    }

    #[test]
    fn test_word_overlap_empty_reference() {
        assert_eq!(word_overlap(&tokenize("anything"), &[]), 0.0);
        assert_eq!(word_overlap(&[], &tokenize("anything")), 0.0);
    }

    #[test]
    fn test_length_metrics() {
        let m = length_metrics(&tokenize("one two three"), &tokenize("one two three four five six"));
        assert_eq!(m.candidate_words, 3);
        assert_eq!(m.reference_words, 6);
        assert_eq!(m.ratio, 0.5);
        assert_eq!(m.difference, 3);
    }

    #[test]
    fn test_length_metrics_empty_reference() {
        let m = length_metrics(&tokenize("one two"), &[]);
        assert_eq!(m.ratio, 0.0);
        assert_eq!(m.difference, 2);
    }

    #[test]
    fn test_keyword_presence_is_case_insensitive() {
        let coverage = keyword_presence(
            "The Quick brown fox jumps over the lazy dog",
            &["fox", "DOG", "cat"],
        );
        assert_eq!(coverage.present, vec!["fox", "DOG"]);
        assert_eq!(coverage.missing, vec!["cat"]);
        assert!((coverage.coverage_pct - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(coverage.total(), 3);
    }

    #[test]
    fn test_keyword_presence_matches_substrings() {
        let coverage = keyword_presence("Revenue increased", &["revenue", "crease"]);
        assert_eq!(coverage.coverage_pct, 1.0);
    }

    #[test]
    fn test_keyword_presence_empty_list_is_vacuous() {
        let none: [&str; 0] = [];
        let coverage = keyword_presence("anything", &none);
        assert_eq!(coverage, KeywordCoverage::vacuous());
        assert_eq!(coverage.coverage_pct, 1.0);
        assert!(coverage.present.is_empty() && coverage.missing.is_empty());
    }

    #[test]
    fn test_keyword_presence_skips_blanks_and_duplicates() {
        let coverage = keyword_presence("hello there", &["Hello", "hello", " ", "bye"]);
        assert_eq!(coverage.present, vec!["Hello"]);
        assert_eq!(coverage.missing, vec!["bye"]);
        assert_eq!(coverage.coverage_pct, 0.5);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("One. Two! Three?"), 3);
        assert_eq!(sentence_count(""), 0);
    }
}
