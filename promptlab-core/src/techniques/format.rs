//! Prompt rendering for validated parameters

use serde::{Deserialize, Serialize};

use super::params::{ChainOfThoughtParams, FewShotParams, MetaPromptParams, SingleShotParams, TechniqueParams};
use super::TechniqueKind;

const APPLY_TO_INPUT: &str = "Now, apply the same approach to the following:";

/// A rendered prompt and what went into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResult {
    pub prompt: String,
    pub metadata: PromptMetadata,
}

/// Descriptive fields recorded alongside a prompt, tagged by technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "technique", rename_all = "kebab-case")]
pub enum PromptMetadata {
    SingleShot {
        task_description: String,
        has_example: bool,
    },
    MetaPrompting {
        goal: String,
        has_context: bool,
        has_constraints: bool,
        has_output_format: bool,
    },
    ChainOfThought,
    FewShot {
        task_description: String,
        num_examples: usize,
    },
}

impl PromptMetadata {
    pub fn kind(&self) -> TechniqueKind {
        match self {
            PromptMetadata::SingleShot { .. } => TechniqueKind::SingleShot,
            PromptMetadata::MetaPrompting { .. } => TechniqueKind::MetaPrompting,
            PromptMetadata::ChainOfThought => TechniqueKind::ChainOfThought,
            PromptMetadata::FewShot { .. } => TechniqueKind::FewShot,
        }
    }
}

pub fn render(params: &TechniqueParams) -> PromptResult {
    match params {
        TechniqueParams::SingleShot(p) => single_shot(p),
        TechniqueParams::MetaPrompting(p) => meta_prompting(p),
        TechniqueParams::ChainOfThought(p) => chain_of_thought(p),
        TechniqueParams::FewShot(p) => few_shot(p),
    }
}

fn single_shot(p: &SingleShotParams) -> PromptResult {
    let prompt = format!(
        "Task: {}\n\nExample:\nInput: {}\nOutput: {}\n\n{}\nInput: {}\nOutput:",
        p.task_description, p.example_input, p.example_output, APPLY_TO_INPUT, p.actual_input
    );

    PromptResult {
        prompt,
        metadata: PromptMetadata::SingleShot {
            task_description: p.task_description.clone(),
            has_example: true,
        },
    }
}

fn meta_prompting(p: &MetaPromptParams) -> PromptResult {
    let mut prompt = String::from(
        "You are an expert prompt engineer. Generate an optimized prompt for the following task:",
    );
    prompt.push_str(&format!("\nGoal: {}", p.goal));

    let sections = [
        ("Context", &p.context),
        ("Constraints", &p.constraints),
        ("Desired Output Format", &p.output_format),
    ];
    for (label, value) in sections {
        if let Some(value) = value {
            prompt.push_str(&format!("\n{}: {}", label, value));
        }
    }

    prompt.push_str(
        "\n\nGenerate a clear, effective prompt that will help achieve this goal. \
         The prompt should be specific, actionable, and optimized for LLM understanding.",
    );

    PromptResult {
        prompt,
        metadata: PromptMetadata::MetaPrompting {
            goal: p.goal.clone(),
            has_context: p.context.is_some(),
            has_constraints: p.constraints.is_some(),
            has_output_format: p.output_format.is_some(),
        },
    }
}

fn chain_of_thought(p: &ChainOfThoughtParams) -> PromptResult {
    let prompt = format!(
        "Task: {}\n\n\
         Input: {}\n\n\
         Please solve this step by step:\n\
         1. First, analyze the input and identify key components\n\
         2. Then, apply the necessary reasoning or transformations\n\
         3. Finally, provide the output with your reasoning\n\n\
         Let's work through this systematically:",
        p.task, p.input_text
    );

    PromptResult {
        prompt,
        metadata: PromptMetadata::ChainOfThought,
    }
}

fn few_shot(p: &FewShotParams) -> PromptResult {
    let mut prompt = format!("Task: {}\n", p.task_description);
    for (i, example) in p.examples.iter().enumerate() {
        prompt.push_str(&format!(
            "\nExample {}:\nInput: {}\nOutput: {}\n",
            i + 1,
            example.input,
            example.output
        ));
    }
    prompt.push_str(&format!("\n{}\nInput: {}\nOutput:", APPLY_TO_INPUT, p.actual_input));

    PromptResult {
        prompt,
        metadata: PromptMetadata::FewShot {
            task_description: p.task_description.clone(),
            num_examples: p.examples.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::techniques::params::Example;

    #[test]
    fn test_single_shot_layout() {
        let result = render(&TechniqueParams::SingleShot(SingleShotParams {
            task_description: "Translate English to French".into(),
            example_input: "Hello".into(),
            example_output: "Bonjour".into(),
            actual_input: "Good morning".into(),
        }));
        assert_eq!(
            result.prompt,
            "Task: Translate English to French\n\n\
             Example:\nInput: Hello\nOutput: Bonjour\n\n\
             Now, apply the same approach to the following:\nInput: Good morning\nOutput:"
        );
        assert_eq!(result.metadata.kind(), TechniqueKind::SingleShot);
    }

    #[test]
    fn test_meta_prompting_sections_in_order() {
        let result = render(&TechniqueParams::MetaPrompting(MetaPromptParams {
            goal: "Summarize papers".into(),
            context: None,
            constraints: Some("Under 100 words".into()),
            output_format: Some("Bullet list".into()),
        }));
        let prompt = &result.prompt;
        assert!(prompt.starts_with("You are an expert prompt engineer."));
        assert!(!prompt.contains("Context:"));
        let goal = prompt.find("Goal: Summarize papers").unwrap();
        let constraints = prompt.find("Constraints: Under 100 words").unwrap();
        let format = prompt.find("Desired Output Format: Bullet list").unwrap();
        assert!(goal < constraints && constraints < format);
        assert!(prompt.ends_with("optimized for LLM understanding."));
        assert_eq!(
            result.metadata,
            PromptMetadata::MetaPrompting {
                goal: "Summarize papers".into(),
                has_context: false,
                has_constraints: true,
                has_output_format: true,
            }
        );
    }

    #[test]
    fn test_chain_of_thought_asks_for_steps() {
        let result = render(&TechniqueParams::ChainOfThought(ChainOfThoughtParams {
            task: "Solve the word problem".into(),
            input_text: "Two trains leave...".into(),
        }));
        assert!(result.prompt.starts_with("Task: Solve the word problem\n\nInput: Two trains leave...\n\n"));
        assert!(result.prompt.contains("1. First, analyze the input"));
        assert!(result.prompt.ends_with("Let's work through this systematically:"));
        assert_eq!(result.metadata, PromptMetadata::ChainOfThought);
    }

    #[test]
    fn test_few_shot_numbers_examples() {
        let result = render(&TechniqueParams::FewShot(FewShotParams {
            task_description: "Classify sentiment".into(),
            examples: vec![
                Example {
                    input: "good".into(),
                    output: "positive".into(),
                },
                Example {
                    input: "bad".into(),
                    output: "negative".into(),
                },
            ],
            actual_input: "fine".into(),
        }));
        assert_eq!(
            result.prompt,
            "Task: Classify sentiment\n\n\
             Example 1:\nInput: good\nOutput: positive\n\n\
             Example 2:\nInput: bad\nOutput: negative\n\n\
             Now, apply the same approach to the following:\nInput: fine\nOutput:"
        );
        assert_eq!(
            result.metadata,
            PromptMetadata::FewShot {
                task_description: "Classify sentiment".into(),
                num_examples: 2,
            }
        );
    }

    #[test]
    fn test_metadata_is_tagged_by_technique() {
        let json = serde_json::to_value(PromptMetadata::FewShot {
            task_description: "t".into(),
            num_examples: 1,
        })
        .unwrap();
        assert_eq!(json["technique"], "few-shot");
        assert_eq!(json["num_examples"], 1);

        let json = serde_json::to_value(PromptMetadata::ChainOfThought).unwrap();
        assert_eq!(json, serde_json::json!({"technique": "chain-of-thought"}));
    }
}
