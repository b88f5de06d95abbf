//! promptlab CLI

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use promptlab::{evaluate_output, evaluate_output_with, MetricSelection, TechniqueRegistry};
use promptlab_cli::{
    comparator::{compare_techniques, ComparisonMetric},
    config::{Config, ReportFormat},
    loader::{build_params, parse_keywords, read_text},
    reporting::{
        render_comparison, render_evaluation, render_prompt, render_run_report, render_tasks, render_techniques,
        render_template, RunLog, RunRecord,
    },
    template::{fill_template, list_tasks},
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "promptlab")]
#[command(about = "Apply prompt engineering techniques and score model responses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Technique parameter sources, merged in the order listed
#[derive(Args)]
struct ParamArgs {
    /// JSON file holding a parameter object
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Inline JSON parameter object
    #[arg(long)]
    params_json: Option<String>,

    /// Single parameter as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    param: Vec<String>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct CandidateArgs {
    /// Candidate text to evaluate
    #[arg(long)]
    candidate: Option<String>,

    /// File holding the candidate text
    #[arg(long)]
    candidate_file: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct ResponseArgs {
    /// Model response text
    #[arg(long)]
    response: Option<String>,

    /// File holding the model response
    #[arg(long)]
    response_file: Option<PathBuf>,
}

#[derive(Args)]
#[group(multiple = false)]
struct ReferenceArgs {
    /// Reference text to compare against
    #[arg(long)]
    reference: Option<String>,

    /// File holding the reference text
    #[arg(long)]
    reference_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available techniques
    Techniques {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a prompt with a technique
    Apply {
        /// Technique identifier (single-shot, meta-prompting, chain-of-thought, few-shot)
        #[arg(short, long)]
        technique: String,

        #[command(flatten)]
        params: ParamArgs,

        /// Print the prompt and metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a candidate text
    Evaluate {
        #[command(flatten)]
        candidate: CandidateArgs,

        #[command(flatten)]
        reference: ReferenceArgs,

        /// Comma-separated keywords the candidate should mention
        #[arg(short, long)]
        keywords: Option<String>,

        /// Comma-separated metrics to compute (bleu, word_overlap, length, keywords); default all
        #[arg(long)]
        metrics: Option<MetricSelection>,

        /// Output format (default from configuration)
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
    },

    /// Build a prompt, score the model's response and log the run
    Run {
        /// Technique identifier
        #[arg(short, long)]
        technique: String,

        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        response: ResponseArgs,

        /// Model that produced the response
        #[arg(short, long)]
        model: Option<String>,

        /// Response latency in milliseconds
        #[arg(long)]
        latency_ms: Option<f64>,

        #[command(flatten)]
        reference: ReferenceArgs,

        /// Comma-separated keywords the response should mention
        #[arg(short, long)]
        keywords: Option<String>,

        /// Run log path (default from configuration)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Do not append the run to the log
        #[arg(long)]
        no_log: bool,

        /// Output format (default from configuration)
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
    },

    /// Rank logged runs by a metric
    Compare {
        /// Run log path (default from configuration)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Metric to rank by
        #[arg(short, long, value_enum, default_value = "bleu_score")]
        metric: ComparisonMetric,

        /// Output format (default from configuration)
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
    },

    /// List supported models
    ListModels {
        /// Provider name, or "all"
        #[arg(long, default_value = "all")]
        provider: String,
    },

    /// List task prompt templates
    ListTasks {
        /// Task name, or "all"
        #[arg(long, default_value = "all")]
        task: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fill a task prompt template with input
    Template {
        /// Task name
        #[arg(short, long, default_value = "summarization")]
        task: String,

        /// Template type within the task
        #[arg(long = "type", default_value = "article-summarization")]
        prompt_type: String,

        /// Text substituted for {input}
        #[arg(short, long, default_value = "")]
        input: String,

        /// Print the filled template as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "promptlab.toml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("promptlab=debug,promptlab_cli=debug,info")
    } else {
        EnvFilter::new("promptlab=info,promptlab_cli=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> CliResult {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Techniques { json } => list_techniques(json)?,

        Commands::Apply {
            technique,
            params,
            json,
        } => apply(&technique, &params, json)?,

        Commands::Evaluate {
            candidate,
            reference,
            keywords,
            metrics,
            format,
        } => {
            let config = Config::load(config_path)?;
            let metrics = metrics.unwrap_or_default();
            evaluate(
                &candidate,
                &reference,
                keywords.as_deref(),
                &metrics,
                format.unwrap_or(config.report.format),
            )?;
        }

        Commands::Run {
            technique,
            params,
            response,
            model,
            latency_ms,
            reference,
            keywords,
            log,
            no_log,
            format,
        } => {
            let config = Config::load(config_path)?;
            let run_log = if no_log || !config.logging.enabled {
                None
            } else {
                Some(RunLog::new(log.unwrap_or_else(|| config.logging.run_log.clone())))
            };
            let format = format.unwrap_or(config.report.format);
            let options = RunOptions {
                model,
                latency_ms,
                keywords,
                run_log,
                format,
            };
            run(&config, &technique, &params, &response, &reference, options)?;
        }

        Commands::Compare {
            log,
            metric,
            format,
        } => {
            let config = Config::load(config_path)?;
            let path = log.unwrap_or_else(|| config.logging.run_log.clone());
            compare(&path, metric, format.unwrap_or(config.report.format))?;
        }

        Commands::ListModels { provider } => {
            let config = Config::load(config_path)?;
            list_models(&config, &provider)?;
        }

        Commands::ListTasks { task, json } => {
            let config = Config::load(config_path)?;
            show_tasks(&config, &task, json)?;
        }

        Commands::Template {
            task,
            prompt_type,
            input,
            json,
        } => {
            let config = Config::load(config_path)?;
            template(&config, &task, &prompt_type, &input, json)?;
        }

        Commands::InitConfig { output } => init_config(output)?,
    }

    Ok(())
}

fn list_techniques(json: bool) -> CliResult {
    let registry = TechniqueRegistry::standard();
    if json {
        let specs: Vec<_> = registry.specs().collect();
        println!("{}", serde_json::to_string_pretty(&specs)?);
    } else {
        print!("{}", render_techniques(&registry));
    }
    Ok(())
}

fn apply(technique: &str, params: &ParamArgs, json: bool) -> CliResult {
    let registry = TechniqueRegistry::standard();
    let params = build_params(params.params.as_deref(), params.params_json.as_deref(), &params.param)?;
    let result = registry.apply(technique, &params)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_prompt(&result));
    }
    Ok(())
}

fn read_reference(reference: &ReferenceArgs) -> Result<Option<String>, Box<dyn std::error::Error>> {
    Ok(read_text(reference.reference.as_deref(), reference.reference_file.as_deref())?)
}

fn evaluate(
    candidate: &CandidateArgs,
    reference: &ReferenceArgs,
    keywords: Option<&str>,
    metrics: &MetricSelection,
    format: ReportFormat,
) -> CliResult {
    let candidate = read_text(candidate.candidate.as_deref(), candidate.candidate_file.as_deref())?
        .ok_or("either --candidate or --candidate-file is required")?;
    let reference = read_reference(reference)?;
    let keywords = keywords.map(parse_keywords);

    let report = evaluate_output_with(&candidate, reference.as_deref(), keywords.as_deref(), metrics);

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Console => {
            println!("=== Evaluation ===\n");
            print!("{}", render_evaluation(&report));
        }
    }
    Ok(())
}

struct RunOptions {
    model: Option<String>,
    latency_ms: Option<f64>,
    keywords: Option<String>,
    run_log: Option<RunLog>,
    format: ReportFormat,
}

fn run(
    config: &Config,
    technique: &str,
    params: &ParamArgs,
    response: &ResponseArgs,
    reference: &ReferenceArgs,
    options: RunOptions,
) -> CliResult {
    if let Some(model) = &options.model {
        if !config.supports_model(model) {
            return Err(format!(
                "Model {} not supported. Run `promptlab list-models` to see available models",
                model
            )
            .into());
        }
    }

    let registry = TechniqueRegistry::standard();
    let spec = registry.resolve(technique)?;
    let params = build_params(params.params.as_deref(), params.params_json.as_deref(), &params.param)?;

    let result = match registry.apply(technique, &params) {
        Ok(result) => result,
        Err(e) => {
            if let Some(log) = &options.run_log {
                let record = RunRecord::failure(spec.kind, e.to_string()).with_model(options.model.clone());
                if let Err(log_err) = log.append(&record) {
                    tracing::warn!("Failed to log rejected run: {}", log_err);
                }
            }
            return Err(e.into());
        }
    };

    let output = read_text(response.response.as_deref(), response.response_file.as_deref())?
        .ok_or("either --response or --response-file is required")?;
    let reference = read_reference(reference)?;
    let keywords = options.keywords.as_deref().map(parse_keywords);

    let report = evaluate_output(&output, reference.as_deref(), keywords.as_deref());

    let record = RunRecord::success(spec.kind, &result, output.as_str())
        .with_model(options.model)
        .with_latency(options.latency_ms)
        .with_evaluation(report.clone(), reference, keywords);

    match options.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        ReportFormat::Console => {
            print!("{}", render_prompt(&result));
            println!("\nResponse:\n{}\n", output);
            print!("{}", render_run_report(spec.kind, &result.prompt, &output, &report));
        }
    }

    if let Some(log) = &options.run_log {
        log.append(&record)?;
        if options.format == ReportFormat::Console {
            println!("Run logged to {}", log.path().display());
        }
    }

    Ok(())
}

fn compare(log_path: &Path, metric: ComparisonMetric, format: ReportFormat) -> CliResult {
    let records = RunLog::new(log_path).read_all()?;
    let comparison = compare_techniques(&records, metric)?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
        ReportFormat::Console => print!("{}", render_comparison(&comparison)),
    }
    Ok(())
}

fn list_models(config: &Config, provider: &str) -> CliResult {
    let providers = if provider == "all" {
        config.enabled_providers()
    } else {
        let selected = config
            .get_provider(provider)
            .ok_or_else(|| format!("Unknown provider: {}", provider))?;
        vec![selected]
    };

    let total: usize = providers.iter().map(|p| p.models.len()).sum();
    println!("Available Models ({}):", total);
    println!("{:-<60}", "");

    for provider in providers {
        for model in &provider.models {
            println!("  {} | {}", provider.name, model);
        }
    }

    Ok(())
}

fn show_tasks(config: &Config, task: &str, json: bool) -> CliResult {
    let tasks = list_tasks(config, task)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        print!("{}", render_tasks(&tasks));
    }
    Ok(())
}

fn template(config: &Config, task: &str, prompt_type: &str, input: &str, json: bool) -> CliResult {
    let filled = fill_template(config, task, prompt_type, input)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&filled)?);
    } else {
        print!("{}", render_template(&filled));
    }
    Ok(())
}

fn init_config(output: PathBuf) -> CliResult {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
