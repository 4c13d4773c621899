//! Google Gemini search provider.

use crate::error::Result;
use crate::provider::{RawLead, SearchProvider};
use crate::providers::common::{build_http_client, strip_code_fence};
use crate::quota::ProviderFailure;
use crate::request::LeadRequest;
use async_trait::async_trait;
use reqwest::Client;
use scout_core::GeminiConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Google Gemini provider using `generateContent` with Google Search grounding
/// and a JSON response schema.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given API key and default settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&GeminiConfig::default(), api_key)
    }

    /// Create a provider from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = build_http_client(Some(config.timeout_secs))?;

        Ok(Self {
            api_key: api_key.into(),
            model: config.model.clone(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Model this provider calls.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Convert a lead request to Gemini API format.
    fn to_api_request(request: &LeadRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: request.system_instruction.clone(),
                }],
            }),
            tools: if request.grounding {
                vec![GeminiTool {
                    google_search: serde_json::json!({}),
                }]
            } else {
                Vec::new()
            },
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
            },
        }
    }

    /// Extract the lead array from a successful response body.
    fn parse_response(
        response: GeminiResponse,
    ) -> std::result::Result<Vec<RawLead>, ProviderFailure> {
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            ProviderFailure::new(format!("empty response from gemini: {reason}"))
        })?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Self::parse_leads(&text)
    }

    fn parse_leads(text: &str) -> std::result::Result<Vec<RawLead>, ProviderFailure> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str::<Vec<RawLead>>(body).map_err(|e| {
            ProviderFailure::new(format!("response is not a lead array: {e}"))
                .with_detail(body.chars().take(500).collect::<String>())
        })
    }

    /// Turn an error response into a failure, keeping the body as detail.
    fn failure_from_body(status: u16, body: &str) -> ProviderFailure {
        let failure = ProviderFailure::new(format!("gemini returned HTTP {status}"))
            .with_status(status)
            .with_detail(body);

        match serde_json::from_str::<GeminiErrorEnvelope>(body) {
            Ok(envelope) => {
                let mut failure = ProviderFailure {
                    message: envelope.error.message,
                    ..failure
                };
                if let Some(code) = envelope.error.status {
                    failure = failure.with_code(code);
                }
                failure
            }
            Err(_) => failure,
        }
    }
}

#[async_trait]
impl SearchProvider for GeminiProvider {
    async fn search(
        &self,
        request: &LeadRequest,
    ) -> std::result::Result<Vec<RawLead>, ProviderFailure> {
        let api_request = Self::to_api_request(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::failure_from_body(status.as_u16(), &error_text));
        }

        let api_response: GeminiResponse = response.json().await.map_err(|e| {
            ProviderFailure::new(format!("failed to parse gemini response: {e}"))
        })?;

        Self::parse_response(api_response)
    }

    fn provider_id(&self) -> &'static str {
        "gemini"
    }

    fn source_label(&self) -> &'static str {
        "Gemini Search"
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}
