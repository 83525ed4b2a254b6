use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of origin a job posting was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    HnComment,
}

impl SourceKind {
    /// Wire tag used inside stored id strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::HnComment => "hn_comment",
        }
    }

    pub fn parse(tag: &str) -> Result<Self, ParseError> {
        match tag {
            "hn_comment" => Ok(SourceKind::HnComment),
            other => Err(ParseError::UnknownKind(other.to_string())),
        }
    }
}

/// Errors from parsing a stored source id back into a [`JobSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("source id has no ':' separator: {0}")]
    MissingSeparator(String),

    #[error("unknown source kind: {0}")]
    UnknownKind(String),
}

/// Identity of a single job posting at its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSource {
    pub kind: SourceKind,
    /// URL of the page the posting was scraped from.
    pub url: String,
    /// Source-native identifier (the HN comment id).
    pub identifier: String,
    /// Posting time as reported by the source, when recoverable.
    pub posted_at: Option<DateTime<Utc>>,
}

impl JobSource {
    pub fn hn_comment(
        url: impl Into<String>,
        identifier: impl Into<String>,
        posted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            kind: SourceKind::HnComment,
            url: url.into(),
            identifier: identifier.into(),
            posted_at,
        }
    }

    /// Stable id string used for dedup: `"<kind>:<identifier>"`.
    /// Distinct (kind, identifier) pairs map to distinct strings because
    /// kind tags never contain `:`.
    pub fn to_id(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.identifier)
    }

    /// Parse an id previously produced by [`JobSource::to_id`]. Splits on the
    /// first `:` only; identifiers may themselves contain `:`.
    ///
    /// The id string carries neither url nor timestamp, so callers supply
    /// whatever context they have.
    pub fn from_id(
        id: &str,
        url: impl Into<String>,
        posted_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ParseError> {
        let (kind, identifier) = id
            .split_once(':')
            .ok_or_else(|| ParseError::MissingSeparator(id.to_string()))?;
        Ok(Self {
            kind: SourceKind::parse(kind)?,
            url: url.into(),
            identifier: identifier.to_string(),
            posted_at,
        })
    }
}
