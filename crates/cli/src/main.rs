mod args;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use jobsidian_fetch::fetch_thread;
use jobsidian_llm::{JobExtractor, OpenRouterProvider};
use jobsidian_notes::read_notes;
use jobsidian_pipeline::{qualify, throttle_every, DedupIndex, Pipeline, RunOptions};

use crate::args::Args;

/// Response budget for a single extraction.
const MAX_TOKENS: u32 = 2000;

const EXIT_NO_POSTINGS: u8 = 1;
const EXIT_MISSING_CV: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    jobsidian_core::config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    if !args.cv.exists() {
        error!("CV file not found: {}", args.cv.display());
        return Ok(ExitCode::from(EXIT_MISSING_CV));
    }
    // CVs exported from word processors are not always clean UTF-8.
    let cv_bytes = std::fs::read(&args.cv).context("failed to read CV file")?;
    let cv_text = String::from_utf8_lossy(&cv_bytes).into_owned();

    std::fs::create_dir_all(&args.out).context("failed to create output directory")?;

    info!("Reading existing job notes to avoid duplicates…");
    let existing = read_notes(&args.out);
    let dedup = DedupIndex::build(&existing);

    info!("Fetching HN post…");
    let comments = fetch_thread(&args.url)
        .await
        .context("failed to fetch thread")?;
    let postings = qualify(comments, args.min_chars, args.max_posts);
    if postings.is_empty() {
        warn!("No sufficiently long comments found. Try lowering --min-chars.");
        return Ok(ExitCode::from(EXIT_NO_POSTINGS));
    }

    info!(
        "Processing {} postings with model {}…",
        postings.len(),
        args.model
    );
    let provider = OpenRouterProvider::new(args.api_key.clone(), args.model.clone())?;
    let extractor = JobExtractor::new(Box::new(provider), args.temperature, MAX_TOKENS);
    let options = RunOptions {
        concurrency: args.concurrency,
        dry_run: args.dry_run,
        throttle: throttle_every(args.rate_limit),
    };
    let pipeline = Pipeline::new(extractor, dedup, args.url, args.out.clone(), options);

    let summary = pipeline.run(&cv_text, &postings).await;
    info!(
        "Done. Processed={} Skipped={} Errors={}. Output: {}",
        summary.processed,
        summary.skipped,
        summary.errors,
        args.out.display()
    );
    Ok(ExitCode::SUCCESS)
}
