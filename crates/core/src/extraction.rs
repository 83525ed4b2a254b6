use serde::{Deserialize, Serialize};

use crate::source::JobSource;

/// Structured result of classifying one job posting, bound to its source
/// identity.
///
/// Tag vectors hold only trimmed, lowercased, non-empty tokens in first-seen
/// order; `fit` and `interest` always sit within 1..=5. Results are created
/// once per non-duplicate posting and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobExtraction {
    pub source: JobSource,
    pub company: Option<String>,
    pub title: Option<String>,
    /// Free-text compensation as stated in the posting (range, currency, equity).
    pub compensation: Option<String>,
    pub time_zone: Option<String>,
    pub location_tags: Vec<String>,
    pub tech_tags: Vec<String>,
    pub topic_tags: Vec<String>,
    /// How well the posting matches the CV, 1 (poor) to 5 (excellent).
    pub fit: u8,
    /// How interesting the role looks independent of fit, 1 to 5.
    pub interest: u8,
}
