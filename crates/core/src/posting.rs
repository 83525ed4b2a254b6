use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single top-level comment scraped from a hiring thread.
///
/// Immutable once constructed; lives only for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    /// Source-native comment id.
    pub identifier: String,
    /// Comment body converted to Markdown.
    pub text: String,
    /// When the comment was posted, if the page exposed it.
    pub posted_at: Option<DateTime<Utc>>,
}
