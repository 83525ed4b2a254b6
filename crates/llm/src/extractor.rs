use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use jobsidian_core::{score, tags, JobExtraction, JobSource};

use crate::prompts;
use crate::provider::{LlmError, LlmProvider, Message, ResponseSchema, Role};

/// Score bounds and the fallback used when the model returns junk.
const SCORE_MIN: u8 = 1;
const SCORE_MAX: u8 = 5;
const SCORE_DEFAULT: u8 = 1;

/// Sends one job posting plus the CV to an LLM and turns the structured
/// response into a [`JobExtraction`].
pub struct JobExtractor {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

/// Wire shape of the model response. String fields are hard-typed so a wrong
/// JSON type fails the extraction; tag lists and scores stay loose and are
/// normalized afterwards.
#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    compensation: Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    location_tags: Vec<Value>,
    #[serde(default)]
    tech_tags: Vec<Value>,
    #[serde(default)]
    topic_tags: Vec<Value>,
    #[serde(default)]
    fit: Value,
    #[serde(default)]
    interest: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("invalid extraction response: {reason}")]
    InvalidResponse {
        reason: String,
        raw_response: String,
    },
}

impl JobExtractor {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Classify one posting against the CV. Returns the structured result or
    /// fails; a bad model response never yields a partial extraction.
    pub async fn extract(
        &self,
        cv_text: &str,
        job_text: &str,
        source: JobSource,
    ) -> Result<JobExtraction, ExtractionError> {
        let messages = vec![
            Message {
                role: Role::System,
                content: prompts::EXTRACTION_SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: Role::User,
                content: prompts::build_user_prompt(cv_text, job_text),
            },
        ];
        let schema = ResponseSchema {
            name: prompts::EXTRACTION_SCHEMA_NAME,
            schema: prompts::extraction_schema(),
        };

        let response = self
            .provider
            .complete(messages, self.temperature, self.max_tokens, Some(&schema))
            .await?;

        debug!("LLM response: {}", response);

        // Extract JSON from response (handle markdown code blocks)
        let json_str = extract_json(&response);

        let raw: RawExtraction =
            serde_json::from_str(json_str).map_err(|e| ExtractionError::InvalidResponse {
                reason: e.to_string(),
                raw_response: response.clone(),
            })?;

        Ok(JobExtraction {
            source,
            company: norm_str(raw.company),
            title: norm_str(raw.title),
            compensation: norm_str(raw.compensation),
            time_zone: norm_str(raw.time_zone),
            location_tags: tags::normalize(&raw.location_tags),
            tech_tags: tags::normalize(&raw.tech_tags),
            topic_tags: tags::normalize(&raw.topic_tags),
            fit: score::clamp(&raw.fit, SCORE_MIN, SCORE_MAX, SCORE_DEFAULT),
            interest: score::clamp(&raw.interest, SCORE_MIN, SCORE_MAX, SCORE_DEFAULT),
        })
    }
}

/// Trim a model-supplied string field; whitespace-only collapses to None.
fn norm_str(raw: Option<String>) -> Option<String> {
    let s = raw?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Extract JSON from an LLM response, handling markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks
    if let Some(start) = trimmed.find("```") {
        let json_start = start + 3;
        // Skip past any language identifier on the same line
        let after_tick = &trimmed[json_start..];
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    // Try raw JSON (starts with {)
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Canned-response provider that records the schema it was asked for.
    struct StubProvider {
        response: Result<String, &'static str>,
        captured_schema: Arc<Mutex<Option<Value>>>,
    }

    impl StubProvider {
        fn ok(response: impl Into<String>) -> Self {
            Self {
                response: Ok(response.into()),
                captured_schema: Arc::new(Mutex::new(None)),
            }
        }

        fn failing(body: &'static str) -> Self {
            Self {
                response: Err(body),
                captured_schema: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn complete(
            &self,
            _messages: Vec<Message>,
            _temperature: f32,
            _max_tokens: u32,
            response_schema: Option<&ResponseSchema>,
        ) -> Result<String, LlmError> {
            *self.captured_schema.lock().unwrap() =
                response_schema.map(|rs| rs.schema.clone());
            match &self.response {
                Ok(s) => Ok(s.clone()),
                Err(body) => Err(LlmError::ApiError {
                    status: 500,
                    body: (*body).to_string(),
                }),
            }
        }
    }

    fn source() -> JobSource {
        JobSource::hn_comment("https://news.ycombinator.com/item?id=1", "42", None)
    }

    fn extractor(provider: StubProvider) -> JobExtractor {
        JobExtractor::new(Box::new(provider), 0.1, 2000)
    }

    #[tokio::test]
    async fn maps_full_response() {
        let response = json!({
            "company": " Acme ",
            "title": "Senior Rust Engineer",
            "compensation": "$150k-$180k",
            "time_zone": "CET +/- 2h",
            "location_tags": ["Berlin", "remote", "berlin"],
            "tech_tags": ["rust", 42, "aws"],
            "topic_tags": [],
            "fit": 4,
            "interest": "5",
        });
        let ex = extractor(StubProvider::ok(response.to_string()));

        let result = ex.extract("cv", "job", source()).await.unwrap();
        assert_eq!(result.company.as_deref(), Some("Acme"));
        assert_eq!(result.title.as_deref(), Some("Senior Rust Engineer"));
        assert_eq!(result.compensation.as_deref(), Some("$150k-$180k"));
        assert_eq!(result.time_zone.as_deref(), Some("CET +/- 2h"));
        assert_eq!(result.location_tags, vec!["berlin", "remote"]);
        assert_eq!(result.tech_tags, vec!["rust", "aws"]);
        assert!(result.topic_tags.is_empty());
        assert_eq!(result.fit, 4);
        assert_eq!(result.interest, 5);
        assert_eq!(result.source.identifier, "42");
    }

    #[tokio::test]
    async fn non_integer_score_falls_back_to_one() {
        let response = json!({
            "company": "Acme",
            "title": null,
            "compensation": null,
            "time_zone": null,
            "location_tags": [],
            "tech_tags": [],
            "topic_tags": [],
            "fit": "high",
            "interest": 6,
        });
        let ex = extractor(StubProvider::ok(response.to_string()));

        let result = ex.extract("cv", "job", source()).await.unwrap();
        assert_eq!(result.fit, 1);
        assert_eq!(result.interest, 5);
    }

    #[tokio::test]
    async fn fenced_response_still_parses() {
        let fenced = "```json\n{\"company\": \"Acme\", \"fit\": 3, \"interest\": 2}\n```";
        let ex = extractor(StubProvider::ok(fenced));

        let result = ex.extract("cv", "job", source()).await.unwrap();
        assert_eq!(result.company.as_deref(), Some("Acme"));
        assert_eq!(result.fit, 3);
    }

    #[tokio::test]
    async fn empty_object_yields_nulls_and_default_scores() {
        let ex = extractor(StubProvider::ok("{}"));

        let result = ex.extract("cv", "job", source()).await.unwrap();
        assert_eq!(result.company, None);
        assert!(result.location_tags.is_empty());
        assert_eq!(result.fit, 1);
        assert_eq!(result.interest, 1);
    }

    #[tokio::test]
    async fn non_json_response_is_an_error() {
        let ex = extractor(StubProvider::ok("I could not find a job posting here."));

        let err = ex.extract("cv", "job", source()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn wrong_string_field_type_is_an_error() {
        let response = json!({
            "company": 12345,
            "fit": 3,
            "interest": 3,
        });
        let ex = extractor(StubProvider::ok(response.to_string()));

        let err = ex.extract("cv", "job", source()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let ex = extractor(StubProvider::failing("rate limited"));

        let err = ex.extract("cv", "job", source()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Llm(_)));
    }

    #[tokio::test]
    async fn requests_the_extraction_schema() {
        let provider = StubProvider::ok("{}");
        let captured = provider.captured_schema.clone();
        let ex = extractor(provider);
        let _ = ex.extract("cv", "job", source()).await.unwrap();

        let schema = captured
            .lock()
            .unwrap()
            .clone()
            .expect("schema was not forwarded to the provider");
        assert_eq!(schema["required"].as_array().unwrap().len(), 9);
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[test]
    fn norm_str_trims_and_drops_empty() {
        assert_eq!(norm_str(Some(" Acme ".into())).as_deref(), Some("Acme"));
        assert_eq!(norm_str(Some("   ".into())), None);
        assert_eq!(norm_str(None), None);
    }

    #[test]
    fn extract_json_raw() {
        let input = r#"{"company": null}"#;
        assert_eq!(extract_json(input), r#"{"company": null}"#);
    }

    #[test]
    fn extract_json_code_block() {
        let input = "Here you go:\n```json\n{\"company\": null}\n```\nDone.";
        assert_eq!(extract_json(input), r#"{"company": null}"#);
    }

    #[test]
    fn extract_json_with_prefix() {
        let input = "Sure! Here's the extraction: {\"company\": null}";
        assert_eq!(extract_json(input), r#"{"company": null}"#);
    }
}
