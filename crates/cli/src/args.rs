use std::path::PathBuf;

use clap::Parser;

/// Generate Obsidian notes from an HN "Who is Hiring" thread using a CV
/// and an LLM.
#[derive(Parser, Debug)]
#[command(name = "jobsidian")]
pub struct Args {
    /// Path to the CV text file
    #[arg(long)]
    pub cv: PathBuf,

    /// URL of the HN "Who is Hiring" post
    #[arg(long)]
    pub url: String,

    /// Output directory for generated Obsidian notes
    #[arg(long, default_value = "jobsidian_output")]
    pub out: PathBuf,

    /// OpenRouter model name
    #[arg(
        long,
        env = "OPENROUTER_MODEL",
        default_value = "openrouter/sherlock-dash-alpha"
    )]
    pub model: String,

    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Sampling temperature for the model
    #[arg(long, env = "OPENROUTER_TEMPERATURE", default_value_t = 0.1)]
    pub temperature: f32,

    /// Limit number of job postings to process (0 for no limit)
    #[arg(long, default_value_t = 100)]
    pub max_posts: usize,

    /// Minimum characters to consider a comment a job posting
    #[arg(long, default_value_t = 400)]
    pub min_chars: usize,

    /// Run extraction without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Minimum seconds between LLM calls, enforced process-wide (0 for none)
    #[arg(long, default_value_t = 0.0)]
    pub rate_limit: f64,

    /// Number of parallel LLM requests
    #[arg(long, default_value_t = 5)]
    pub concurrency: usize,
}
