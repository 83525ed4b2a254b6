use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobsidian_core::{JobExtraction, JobSource, ParseError};

/// YAML front matter of a job note, following Obsidian conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteFrontMatter {
    /// RFC 3339 creation time.
    pub created: String,
    /// RFC 3339 last-modified time.
    pub modified: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub company: Option<String>,
    pub title: Option<String>,
    pub compensation: Option<String>,
    pub time_zone: Option<String>,
    pub location: Vec<String>,
    pub tech: Vec<String>,
    pub topics: Vec<String>,
    pub fit: u8,
    pub interest: u8,
    pub source_url: String,
    /// Stable source id, e.g. "hn_comment:123456".
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
}

fn default_status() -> String {
    "idea".to_string()
}

impl NoteFrontMatter {
    /// Build front matter for a freshly extracted note.
    pub fn from_extraction(extraction: &JobExtraction, now: DateTime<Utc>) -> Self {
        let now_iso = now.to_rfc3339();
        Self {
            created: now_iso.clone(),
            modified: now_iso,
            status: default_status(),
            company: extraction.company.clone(),
            title: extraction.title.clone(),
            compensation: extraction.compensation.clone(),
            time_zone: extraction.time_zone.clone(),
            location: extraction.location_tags.clone(),
            tech: extraction.tech_tags.clone(),
            topics: extraction.topic_tags.clone(),
            fit: extraction.fit,
            interest: extraction.interest,
            source_url: extraction.source.url.clone(),
            source_id: extraction.source.to_id(),
            posted_at: extraction.source.posted_at.map(|t| t.to_rfc3339()),
        }
    }

    /// Rebuild the extraction this note was written from.
    pub fn into_extraction(self) -> Result<JobExtraction, ParseError> {
        let posted_at = self
            .posted_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        let source = JobSource::from_id(&self.source_id, self.source_url, posted_at)?;
        Ok(JobExtraction {
            source,
            company: self.company,
            title: self.title,
            compensation: self.compensation,
            time_zone: self.time_zone,
            location_tags: self.location,
            tech_tags: self.tech,
            topic_tags: self.topics,
            fit: self.fit,
            interest: self.interest,
        })
    }
}

/// Split note content into (front matter, body). Returns None when the
/// leading `---` block is missing or unterminated.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with("---") {
        return None;
    }
    let after_first = &trimmed[3..];
    // The closing marker must start a line; a `---` inside a YAML value
    // does not end the block.
    let end = after_first.find("\n---")?;
    Some((&after_first[..=end], &after_first[end + 4..]))
}
