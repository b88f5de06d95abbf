//! Task prompt templates
//!
//! Each task maps to a JSON file holding an array of
//! `{"type", "name", "prompt"}` objects. A template's prompt may contain an
//! `{input}` placeholder; `{{` and `}}` stand for literal braces.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::loader::LoadError;

const INPUT_PLACEHOLDER: &str = "input";

/// One prompt template of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    #[serde(rename = "type")]
    pub prompt_type: String,
    pub name: String,
    pub prompt: String,
}

impl PromptTemplate {
    /// Substitute `input` for every `{input}` placeholder
    pub fn fill(&self, input: &str) -> Result<String, LoadError> {
        let mut out = String::with_capacity(self.prompt.len() + input.len());
        let mut chars = self.prompt.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(next) => field.push(next),
                            None => {
                                return Err(self.placeholder_error("unterminated '{'".to_string()));
                            }
                        }
                    }
                    if field != INPUT_PLACEHOLDER {
                        return Err(self.placeholder_error(format!("unknown placeholder {{{}}}", field)));
                    }
                    out.push_str(input);
                }
                '}' => return Err(self.placeholder_error("single '}'".to_string())),
                other => out.push(other),
            }
        }

        Ok(out)
    }

    fn placeholder_error(&self, problem: String) -> LoadError {
        LoadError::Parse(format!("template {}: {}", self.prompt_type, problem))
    }
}

/// A template filled with user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledTemplate {
    pub task: String,
    #[serde(rename = "type")]
    pub prompt_type: String,
    pub name: String,
    pub input: String,
    pub prompt: String,
}

/// Read the templates stored in one task file
pub fn load_templates(path: impl AsRef<Path>) -> Result<Vec<PromptTemplate>, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let templates: Vec<PromptTemplate> = serde_json::from_str(&content)
        .map_err(|e| LoadError::Parse(format!("{}: {}", path.display(), e)))?;
    tracing::debug!("Loaded {} template(s) from {}", templates.len(), path.display());
    Ok(templates)
}

fn task_path<'a>(config: &'a Config, task: &str) -> Result<&'a Path, LoadError> {
    config.task_file(task).ok_or_else(|| LoadError::UnknownTask {
        task: task.to_string(),
        available: config.tasks.keys().map(String::as_str).collect::<Vec<_>>().join(", "),
    })
}

/// Templates of `task`, or of every configured task when `task` is `"all"`
pub fn list_tasks(config: &Config, task: &str) -> Result<IndexMap<String, Vec<PromptTemplate>>, LoadError> {
    let names: Vec<&str> = if task == "all" {
        config.tasks.keys().map(String::as_str).collect()
    } else {
        vec![task]
    };

    let mut tasks = IndexMap::new();
    for name in names {
        let templates = load_templates(task_path(config, name)?)?;
        tasks.insert(name.to_string(), templates);
    }
    Ok(tasks)
}

/// Find the `prompt_type` template of `task` and fill it with `input`
pub fn fill_template(
    config: &Config,
    task: &str,
    prompt_type: &str,
    input: &str,
) -> Result<FilledTemplate, LoadError> {
    let template = load_templates(task_path(config, task)?)?
        .into_iter()
        .find(|t| t.prompt_type == prompt_type)
        .ok_or_else(|| LoadError::UnknownPromptType {
            task: task.to_string(),
            prompt_type: prompt_type.to_string(),
        })?;

    let prompt = template.fill(input)?;
    Ok(FilledTemplate {
        task: task.to_string(),
        prompt_type: template.prompt_type,
        name: template.name,
        input: input.to_string(),
        prompt,
    })
}
