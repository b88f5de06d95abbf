//! Configuration management for the promptlab CLI
//!
//! Loads provider model lists, task template files, run-log settings and
//! report defaults from TOML files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Locations searched by [`Config::load_or_default`], in order.
pub const CONFIG_SEARCH_PATHS: [&str; 2] = ["promptlab.toml", "config/promptlab.toml"];

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: IndexMap<String, ProviderConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    /// Task name to prompt-template JSON file
    #[serde(default)]
    pub tasks: IndexMap<String, PathBuf>,
}

/// Models offered by one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub models: Vec<String>,
}

/// Run-log settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_run_log")]
    pub run_log: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            run_log: default_run_log(),
        }
    }
}

/// Report defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Console => "console",
            ReportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_run_log() -> PathBuf { PathBuf::from("logs/prompt_engineering_runs.jsonl") }

const DEFAULT_TASKS: &[(&str, &str)] = &[
    ("summarization", "prompts/summarization.json"),
    ("coding", "prompts/coding.json"),
];

const OPENAI_MODELS: &[&str] = &[
    "gpt-4.1",
    "gpt-4.1-mini",
    "gpt-4.1-nano",
    "o1",
    "o1-mini",
    "o1-pro",
    "o3",
    "o3-mini",
    "o3-pro",
    "o4-mini",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4.5",
    "gpt-4o-mini-preview",
];

const GROQ_MODELS: &[&str] = &[
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "meta-llama/llama-guard-4-12b",
    "openai/gpt-oss-120b",
    "openai/gpt-oss-20b",
    "meta-llama/llama-4-maverick-17b-128e-instruct",
    "meta-llama/llama-4-scout-17b-16e-instruct",
    "moonshotai/kimi-k2-instruct-0905",
    "qwen/qwen3-32b",
    "deepseek-r1-distill-llama-70b",
];

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from the first default config location that parses, or return defaults
    pub fn load_or_default() -> Self {
        for path in &CONFIG_SEARCH_PATHS {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(ConfigError::Parse(e)) => {
                    tracing::warn!("Ignoring {}: {}", path, e);
                }
                Err(ConfigError::Io(_)) => {}
            }
        }

        tracing::debug!("Using default configuration");
        Self::default()
    }

    /// Load an explicit file, or fall back to [`Config::load_or_default`]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::from_file(path)?;
                tracing::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::load_or_default()),
        }
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Get enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers
            .values()
            .filter(|p| p.enabled)
            .collect()
    }

    /// Get a specific provider config
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    /// Models of one provider, or `None` for an unknown provider
    pub fn models_for(&self, provider: &str) -> Option<&[String]> {
        self.get_provider(provider).map(|p| p.models.as_slice())
    }

    /// Name of the enabled provider that offers `model`
    pub fn provider_of(&self, model: &str) -> Option<&str> {
        self.enabled_providers()
            .into_iter()
            .find(|p| p.models.iter().any(|m| m == model))
            .map(|p| p.name.as_str())
    }

    /// Whether any enabled provider offers `model`
    pub fn supports_model(&self, model: &str) -> bool {
        self.provider_of(model).is_some()
    }

    /// Template file registered for `task`
    pub fn task_file(&self, task: &str) -> Option<&Path> {
        self.tasks.get(task).map(PathBuf::as_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut providers = IndexMap::new();

        for (name, models) in [("openai", OPENAI_MODELS), ("groq", GROQ_MODELS)] {
            providers.insert(name.to_string(), ProviderConfig {
                name: name.to_string(),
                enabled: true,
                models: models.iter().map(|m| m.to_string()).collect(),
            });
        }

        let tasks = DEFAULT_TASKS
            .iter()
            .map(|(task, file)| (task.to_string(), PathBuf::from(file)))
            .collect();

        Self {
            providers,
            logging: LoggingConfig::default(),
            report: ReportConfig::default(),
            tasks,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
