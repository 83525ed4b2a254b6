//! Prompt templates and response schema for job-posting extraction.

use serde_json::{json, Value};

/// Name the structured-output API requires for the schema.
pub const EXTRACTION_SCHEMA_NAME: &str = "job_extraction";

pub const EXTRACTION_SYSTEM_PROMPT: &str = "You are an assistant that extracts structured data from job postings and evaluates fit and interest. Respond ONLY with a compact JSON object matching the required schema.";

/// User prompt template; `{cv_text}` and `{job_text}` are substituted verbatim.
pub const EXTRACTION_USER_TEMPLATE: &str = "\
Extract fields from the job posting and evaluate against the CV.

Return a JSON object with keys:
- company: string | null (verbatim as in the text)
- compensation: string | null (free text as seen)
- time_zone: string | null (time zone or overlap requirement as stated)
- location_tags: array of strings (lowercase simple tags, e.g., ['berlin','hybrid'] or ['nyc','sf'])
- tech_tags: array of strings (lowercase simple tags for relevant technologies, e.g., ['python','aws','docker'])
- topic_tags: array of strings (lowercase simple tags for relevant topics/fields, e.g., ['ml','web','mobile'])
- fit: integer 1-5 (higher means better fit)
- interest: integer 1-5 (higher means more interesting to the candidate)
- title: string | null (job title if identifiable; comma-separated list if multiple jobs included)

Rules:
- Use only integers for fit and interest.
- If uncertain, infer conservatively and return a lower bound; high values in fit and interest should remain rare to provide a clear signal.
- location_tags should be short, normalized tokens: lowercase, no punctuation; split multiple locations separately.

CV:
---
{cv_text}
---

JOB POSTING:
---
{job_text}
---
";

pub fn build_user_prompt(cv_text: &str, job_text: &str) -> String {
    EXTRACTION_USER_TEMPLATE
        .replace("{cv_text}", cv_text)
        .replace("{job_text}", job_text)
}

/// JSON schema for the extraction response. Every key is required and extra
/// properties are rejected, so strict mode pins the whole shape.
pub fn extraction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "company": { "type": ["string", "null"] },
            "title": { "type": ["string", "null"] },
            "compensation": { "type": ["string", "null"] },
            "time_zone": { "type": ["string", "null"] },
            "location_tags": { "type": "array", "items": { "type": "string" } },
            "tech_tags": { "type": "array", "items": { "type": "string" } },
            "topic_tags": { "type": "array", "items": { "type": "string" } },
            "fit": { "type": "integer", "minimum": 1, "maximum": 5 },
            "interest": { "type": "integer", "minimum": 1, "maximum": 5 },
        },
        "required": [
            "company", "title", "compensation", "time_zone",
            "location_tags", "tech_tags", "topic_tags", "fit", "interest",
        ],
        "additionalProperties": false,
    })
}
