//! Append-only JSONL log of technique runs

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use promptlab::{EvaluationReport, PromptMetadata, PromptResult, TechniqueKind};
use serde::{Deserialize, Serialize};

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// One line of the run log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: DateTime<Utc>,
    pub technique: TechniqueKind,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PromptMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecord {
    /// A successful run of `result` that produced `output`
    pub fn success(technique: TechniqueKind, result: &PromptResult, output: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            technique,
            prompt: result.prompt.clone(),
            model: None,
            output: output.into(),
            latency_ms: None,
            status: RunStatus::Success,
            metadata: Some(result.metadata.clone()),
            evaluation: None,
            reference_text: None,
            keywords: None,
            error: None,
        }
    }

    /// A run rejected before a prompt could be produced
    pub fn failure(technique: TechniqueKind, error: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            technique,
            prompt: String::new(),
            model: None,
            output: String::new(),
            latency_ms: None,
            status: RunStatus::Error,
            metadata: None,
            evaluation: None,
            reference_text: None,
            keywords: None,
            error: Some(error.into()),
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_latency(mut self, latency_ms: Option<f64>) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_evaluation(
        mut self,
        evaluation: EvaluationReport,
        reference_text: Option<String>,
        keywords: Option<Vec<String>>,
    ) -> Self {
        self.evaluation = Some(evaluation);
        self.reference_text = reference_text;
        self.keywords = keywords;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// JSONL file of [`RunRecord`]s
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file and its parent directories if needed
    pub fn append(&self, record: &RunRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let line = serde_json::to_string(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;

        tracing::info!("Logged {} run to {}", record.technique, self.path.display());
        Ok(())
    }

    /// Every record in the log, in file order.
    ///
    /// A missing file is an empty log. Lines that do not parse are skipped
    /// with a warning.
    pub fn read_all(&self) -> io::Result<Vec<RunRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut records = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RunRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    "Skipping malformed line {} in {}: {}",
                    line_no + 1,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(records)
    }
}
