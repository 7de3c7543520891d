//! Gemini API client for sentiment report generation.
//!
//! Sends the analysis prompt to `generateContent` and passes the model's
//! text through the validation boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::prompts::{analysis_prompt, response_schema};
use super::AnalysisProvider;
use crate::analysis::model::AnalysisResult;
use crate::analysis::parse_analysis;
use crate::config::ProviderConfig;
use crate::error::{RadarError, RadarResult};

/// Default Gemini API URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const TEMPERATURE: f32 = 0.4;

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    grounded: bool,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    /// Create a new client with the given API key and model.
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
            grounded: false,
            client: build_http_client(Duration::from_secs(60)),
        }
    }

    /// Build a client from provider configuration.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &ProviderConfig) -> RadarResult<Self> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            RadarError::config(
                "GEMINI_API_KEY environment variable not set.\n\
                 Set it with: export GEMINI_API_KEY=your-key",
            )
        })?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            grounded: config.grounded,
            client: build_http_client(Duration::from_secs(config.timeout_secs)),
        })
    }

    /// Use live search grounding instead of a response schema.
    pub fn with_grounding(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, query: &str) -> GenerateContentRequest {
        let (tools, response_mime_type, response_schema) = if self.grounded {
            // The API rejects a response schema combined with search tools.
            (Some(vec![Tool { google_search: GoogleSearch {} }]), None, None)
        } else {
            (
                None,
                Some("application/json".to_string()),
                Some(response_schema()),
            )
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: analysis_prompt(query, self.grounded),
                }],
            }],
            tools,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type,
                response_schema,
            },
        }
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, query: &str) -> RadarResult<AnalysisResult> {
        let request = self.build_request(query);

        debug!(model = %self.model, grounded = self.grounded, "Calling Gemini API");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RadarError::provider(format!(
                "Gemini API error (HTTP {}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = extract_text(body)?;
        debug!(len = text.len(), "Gemini response received");

        parse_analysis(&text)
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Join the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> RadarResult<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(RadarError::provider(format!("prompt blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(RadarError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.finish_reason {
            Some(reason) if reason != "STOP" => Err(RadarError::provider(format!(
                "generation stopped: {}",
                reason
            ))),
            _ => Err(RadarError::EmptyResponse),
        };
    }

    Ok(text)
}
