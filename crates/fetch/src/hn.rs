//! Fetches a Hacker News hiring thread and extracts its top-level comments.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use jobsidian_core::Posting;

use crate::markdown;

/// Hosts hiring threads normally live on. Anything else still gets fetched,
/// just with a warning.
const KNOWN_HN_HOSTS: &[&str] = &[
    "news.ycombinator.com",
    "hacker-news.firebaseio.com",
    "hn.algolia.com",
];

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "jobsidian/0.1";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid thread URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("selector parse failed: {0}")]
    Selector(String),
}

/// Compiled selectors for the pieces of an HN comment row we care about.
struct CommentSelectors {
    comment_row: Selector,
    top_level_indent: Selector,
    body: Selector,
    age: Selector,
}

impl CommentSelectors {
    fn new() -> Result<Self, FetchError> {
        Ok(Self {
            comment_row: Selector::parse("tr.athing.comtr")
                .map_err(|err| FetchError::Selector(err.to_string()))?,
            top_level_indent: Selector::parse(r#"td.ind[indent="0"]"#)
                .map_err(|err| FetchError::Selector(err.to_string()))?,
            body: Selector::parse("div.commtext")
                .map_err(|err| FetchError::Selector(err.to_string()))?,
            age: Selector::parse("span.age")
                .map_err(|err| FetchError::Selector(err.to_string()))?,
        })
    }
}

/// Fetch a hiring thread and return its top-level comments as postings.
pub async fn fetch_thread(url: &str) -> Result<Vec<Posting>, FetchError> {
    validate_thread_url(url)?;

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_thread(&html)
}

fn validate_thread_url(url: &str) -> Result<(), FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    match parsed.host_str() {
        Some(host) if KNOWN_HN_HOSTS.contains(&host) => {}
        Some(host) => warn!("unexpected thread host {host}, fetching anyway"),
        None => return Err(FetchError::InvalidUrl(url.to_string())),
    }
    Ok(())
}

/// Parse thread HTML into postings. Comments are `tr.athing.comtr` rows;
/// only those at indent 0 count, and rows without an id or a body are
/// skipped.
pub fn parse_thread(html: &str) -> Result<Vec<Posting>, FetchError> {
    let selectors = CommentSelectors::new()?;
    let doc = Html::parse_document(html);

    let mut postings = Vec::new();
    for row in doc.select(&selectors.comment_row) {
        if row.select(&selectors.top_level_indent).next().is_none() {
            continue;
        }

        let Some(id) = row.value().attr("id") else {
            warn!("skipping comment without id");
            continue;
        };

        let Some(body) = row.select(&selectors.body).next() else {
            debug!("comment {id} missing body element, skipping");
            continue;
        };

        let posted_at = row
            .select(&selectors.age)
            .next()
            .and_then(|el| el.value().attr("title"))
            .and_then(parse_age_title);

        postings.push(Posting {
            identifier: id.to_string(),
            text: markdown::element_to_markdown(body),
            posted_at,
        });
    }

    Ok(postings)
}

/// HN encodes the comment time in `span.age[title]`, either bare ISO-8601 or
/// `"<iso> <epoch>"`. Times are UTC without an offset suffix.
fn parse_age_title(title: &str) -> Option<DateTime<Utc>> {
    let iso = title.split_whitespace().next()?;
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}
