//! The per-run orchestrator: one classifier attempt per new posting,
//! bounded by a semaphore, with per-item failures isolated.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use governor::{Quota, RateLimiter};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use jobsidian_core::{JobSource, Posting};
use jobsidian_llm::JobExtractor;
use jobsidian_notes::write_note;

use crate::dedup::DedupIndex;

/// Shared token bucket spacing LLM calls process-wide. Unlike a per-task
/// sleep, the spacing holds no matter how many tasks run concurrently.
pub type Throttle = governor::DefaultDirectRateLimiter;

/// Build a throttle allowing one call per `seconds`. Zero or negative
/// disables throttling.
pub fn throttle_every(seconds: f64) -> Option<Arc<Throttle>> {
    if seconds <= 0.0 {
        return None;
    }
    Quota::with_period(Duration::from_secs_f64(seconds))
        .map(|quota| Arc::new(RateLimiter::direct(quota)))
}

/// Keep postings whose trimmed length reaches `min_chars`, then cap the
/// list at `max_posts` (0 = no cap).
pub fn qualify(postings: Vec<Posting>, min_chars: usize, max_posts: usize) -> Vec<Posting> {
    let mut qualified: Vec<Posting> = postings
        .into_iter()
        .filter(|p| p.text.trim().chars().count() >= min_chars)
        .collect();
    if max_posts > 0 {
        qualified.truncate(max_posts);
    }
    qualified
}

pub struct RunOptions {
    /// Maximum number of in-flight classifier calls.
    pub concurrency: usize,
    /// Extract but skip persistence, logging a one-line summary instead.
    pub dry_run: bool,
    pub throttle: Option<Arc<Throttle>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: 5,
            dry_run: false,
            throttle: None,
        }
    }
}

/// Final counts for a run. Every posting lands in exactly one bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

enum Outcome {
    Processed,
    Skipped,
    Failed,
}

/// One pipeline run over a fetched posting list.
pub struct Pipeline {
    extractor: JobExtractor,
    dedup: DedupIndex,
    thread_url: String,
    output_dir: PathBuf,
    options: RunOptions,
}

impl Pipeline {
    pub fn new(
        extractor: JobExtractor,
        dedup: DedupIndex,
        thread_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        options: RunOptions,
    ) -> Self {
        Self {
            extractor,
            dedup,
            thread_url: thread_url.into(),
            output_dir: output_dir.into(),
            options,
        }
    }

    /// Classify every posting and persist the results. Indices in the logs
    /// are 1-based input order, assigned before dispatch. Never fails: each
    /// posting's outcome is counted and the run always completes.
    pub async fn run(&self, cv_text: &str, postings: &[Posting]) -> RunSummary {
        let semaphore = Semaphore::new(self.options.concurrency.max(1));

        let tasks = postings
            .iter()
            .enumerate()
            .map(|(i, posting)| self.process_one(i + 1, posting, cv_text, &semaphore));
        let outcomes = join_all(tasks).await;

        let mut summary = RunSummary::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Processed => summary.processed += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.errors += 1,
            }
        }
        summary
    }

    async fn process_one(
        &self,
        idx: usize,
        posting: &Posting,
        cv_text: &str,
        semaphore: &Semaphore,
    ) -> Outcome {
        let source = JobSource::hn_comment(
            self.thread_url.clone(),
            posting.identifier.clone(),
            posting.posted_at,
        );

        // Duplicates are decided before a slot is taken; a skip never
        // touches the provider.
        let id = source.to_id();
        if self.dedup.contains(&id) {
            info!("[{idx}] skipping already extracted job: {id}");
            return Outcome::Skipped;
        }

        let extraction = {
            let _permit = semaphore.acquire().await.expect("semaphore closed");
            if let Some(throttle) = &self.options.throttle {
                throttle.until_ready().await;
            }
            match self.extractor.extract(cv_text, &posting.text, source).await {
                Ok(extraction) => extraction,
                Err(err) => {
                    warn!("[{idx}] extraction failed: {err}");
                    return Outcome::Failed;
                }
            }
        };

        if self.options.dry_run {
            info!(
                "[{idx}] {} | fit={} interest={} locations={:?} comp={:?}",
                extraction.company.as_deref().unwrap_or("Unknown Company"),
                extraction.fit,
                extraction.interest,
                extraction.location_tags,
                extraction.compensation,
            );
            return Outcome::Processed;
        }

        match write_note(&self.output_dir, &extraction, &posting.text) {
            Ok(path) => {
                info!("[{idx}] wrote {}", path.display());
                Outcome::Processed
            }
            Err(err) => {
                warn!("[{idx}] failed to write note: {err}");
                Outcome::Failed
            }
        }
    }
}
