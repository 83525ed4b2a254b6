//! Reads and writes job notes in an Obsidian vault directory.
//!
//! Notes are `.md` files with YAML front matter followed by the original
//! posting text. The directory is scanned recursively via `walkdir`, so
//! notes moved into subfolders still count for dedup. Writes never clobber:
//! files are created with `create_new` and name collisions get a numeric
//! suffix.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;
use walkdir::WalkDir;

use jobsidian_core::JobExtraction;

use crate::front_matter::{split_front_matter, NoteFrontMatter};

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Load every parseable job note under `dir`. Unreadable or malformed files
/// are skipped so one broken note never blocks a run; a missing directory
/// reads as empty.
pub fn read_notes(dir: &Path) -> Vec<JobExtraction> {
    let mut extractions = Vec::new();
    if !dir.exists() {
        return extractions;
    }

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "walkdir error, skipping entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        match load_note(path) {
            Some(extraction) => extractions.push(extraction),
            None => debug!(path = %path.display(), "skipping unparseable note"),
        }
    }

    extractions
}

fn load_note(path: &Path) -> Option<JobExtraction> {
    let content = std::fs::read_to_string(path).ok()?;
    let (front, _body) = split_front_matter(&content)?;
    let fm: NoteFrontMatter = serde_yaml::from_str(front).ok()?;
    fm.into_extraction().ok()
}

/// Write a note for `extraction`, returning the path it landed at.
///
/// The file name comes from the sanitized company name. Existing files are
/// never overwritten: creation uses `create_new`, and on collision the stem
/// gets a `-2`, `-3`, ... suffix until a create succeeds. This holds even
/// when concurrent writers race for the same stem.
pub fn write_note(
    dir: &Path,
    extraction: &JobExtraction,
    job_text: &str,
) -> Result<PathBuf, NoteError> {
    let stem = safe_file_name(extraction.company.as_deref().unwrap_or("Unknown"));

    let fm = NoteFrontMatter::from_extraction(extraction, Utc::now());
    let yaml = serde_yaml::to_string(&fm)?;
    let body = format!(
        "---\n{}\n---\n\n# {}\n\nOriginal Posting:\n\n````\n{}\n````\n",
        yaml.trim_end(),
        extraction.company.as_deref().unwrap_or("Unknown Company"),
        job_text,
    );

    let mut idx = 1;
    loop {
        let file_name = if idx == 1 {
            format!("{stem}.md")
        } else {
            format!("{stem}-{idx}.md")
        };
        let target = dir.join(file_name);
        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(mut file) => {
                file.write_all(body.as_bytes())?;
                return Ok(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                idx += 1;
            }
            Err(e) => return Err(NoteError::Io(e)),
        }
    }
}

/// Keep alphanumerics, space, `-` and `_`; everything else becomes `-`.
/// A name that cleans down to nothing becomes "Empty".
fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "Empty".to_string()
    } else {
        cleaned.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jobsidian_core::JobSource;
    use tempfile::TempDir;

    fn extraction(company: Option<&str>, identifier: &str) -> JobExtraction {
        let posted_at = chrono::Utc.with_ymd_and_hms(2025, 6, 2, 15, 30, 6).unwrap();
        JobExtraction {
            source: JobSource::hn_comment(
                "https://news.ycombinator.com/item?id=1",
                identifier,
                Some(posted_at),
            ),
            company: company.map(str::to_string),
            title: Some("Engineer".to_string()),
            compensation: Some("$100k".to_string()),
            time_zone: None,
            location_tags: vec!["berlin".to_string(), "remote".to_string()],
            tech_tags: vec!["rust".to_string()],
            topic_tags: vec![],
            fit: 4,
            interest: 3,
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let tmp = TempDir::new().unwrap();
        let original = extraction(Some("Acme"), "42");

        let path = write_note(tmp.path(), &original, "We are hiring.").unwrap();
        assert_eq!(path, tmp.path().join("Acme.md"));

        let loaded = read_notes(tmp.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source, original.source);
        assert_eq!(loaded[0].company, original.company);
        assert_eq!(loaded[0].location_tags, original.location_tags);
        assert_eq!(loaded[0].fit, 4);
    }

    #[test]
    fn triple_dash_in_a_field_does_not_lose_the_note() {
        let tmp = TempDir::new().unwrap();
        let mut original = extraction(Some("Acme"), "42");
        original.compensation = Some("$100k --- plus equity".to_string());

        write_note(tmp.path(), &original, "We are hiring.").unwrap();

        let loaded = read_notes(tmp.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded[0].compensation.as_deref(),
            Some("$100k --- plus equity")
        );
        assert_eq!(loaded[0].source.to_id(), "hn_comment:42");
    }

    #[test]
    fn note_body_keeps_posting_in_a_fence() {
        let tmp = TempDir::new().unwrap();
        let path = write_note(tmp.path(), &extraction(Some("Acme"), "42"), "line one\nline two").unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.contains("\n# Acme\n"));
        assert!(content.contains("Original Posting:\n\n````\nline one\nline two\n````\n"));
    }

    #[test]
    fn missing_company_uses_placeholders() {
        let tmp = TempDir::new().unwrap();
        let path = write_note(tmp.path(), &extraction(None, "42"), "text").unwrap();

        assert_eq!(path, tmp.path().join("Unknown.md"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("# Unknown Company"));
    }

    #[test]
    fn same_company_twice_gets_suffixed_files() {
        let tmp = TempDir::new().unwrap();
        let first = write_note(tmp.path(), &extraction(Some("Acme"), "1"), "a").unwrap();
        let second = write_note(tmp.path(), &extraction(Some("Acme"), "2"), "b").unwrap();
        let third = write_note(tmp.path(), &extraction(Some("Acme"), "3"), "c").unwrap();

        assert_eq!(first, tmp.path().join("Acme.md"));
        assert_eq!(second, tmp.path().join("Acme-2.md"));
        assert_eq!(third, tmp.path().join("Acme-3.md"));
        assert_eq!(read_notes(tmp.path()).len(), 3);
    }

    #[test]
    fn malformed_notes_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write_note(tmp.path(), &extraction(Some("Valid"), "1"), "ok").unwrap();
        std::fs::write(tmp.path().join("no-front-matter.md"), "# plain markdown\n").unwrap();
        std::fs::write(tmp.path().join("bad-yaml.md"), "---\n:{not yaml\n---\nbody\n").unwrap();
        std::fs::write(
            tmp.path().join("bad-id.md"),
            "---\ncreated: 'x'\nmodified: 'x'\ncompany: null\ntitle: null\ncompensation: null\ntime_zone: null\nlocation: []\ntech: []\ntopics: []\nfit: 1\ninterest: 1\nsource_url: u\nsource_id: nosep\n---\nbody\n",
        )
        .unwrap();

        let loaded = read_notes(tmp.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].company.as_deref(), Some("Valid"));
    }

    #[test]
    fn finds_notes_in_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("archive");
        std::fs::create_dir_all(&sub).unwrap();
        write_note(&sub, &extraction(Some("Nested"), "9"), "text").unwrap();

        let loaded = read_notes(tmp.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].company.as_deref(), Some("Nested"));
    }

    #[test]
    fn missing_directory_reads_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_notes(&tmp.path().join("does-not-exist")).is_empty());
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(safe_file_name("Acme Inc. (YC S25)"), "Acme Inc- -YC S25-");
        assert_eq!(safe_file_name("Über GmbH"), "Über GmbH");
        assert_eq!(safe_file_name("a/b\\c"), "a-b-c");
        assert_eq!(safe_file_name("   "), "Empty");
        assert_eq!(safe_file_name(""), "Empty");
    }
}
