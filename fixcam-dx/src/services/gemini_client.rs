//! Gemini multimodal inference client
//!
//! One attempt per diagnosis request at a fixed low temperature; retry
//! policy, if any, belongs to the caller. A provider response saying the
//! requested model does not exist is mapped to ModelUnavailable so callers
//! can surface a clearer diagnosis than a generic failure.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DiagnosisError;
use crate::services::media_normalizer::NormalizedMedia;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;
/// Determinism favored over creativity for structured extraction
const TEMPERATURE: f32 = 0.2;

/// Multimodal analysis boundary
///
/// Injected into the pipeline as an explicit dependency; initialized once
/// at process start and read-only thereafter.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send the rendered prompt plus normalized media, return raw text.
    async fn analyze(
        &self,
        system_context: &str,
        prompt: &str,
        media: &NormalizedMedia,
    ) -> Result<String, DiagnosisError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
    status: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, DiagnosisError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DiagnosisError::InferenceFailure(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Classify a non-success provider response.
    ///
    /// 404 or a NOT_FOUND status in the error body means the requested
    /// model is absent/incompatible; everything else is a plain failure.
    fn classify_failure(model: &str, http_status: u16, body: &str) -> DiagnosisError {
        let provider_status = serde_json::from_str::<ProviderErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.status);

        if http_status == 404 || provider_status.as_deref() == Some("NOT_FOUND") {
            return DiagnosisError::ModelUnavailable(format!(
                "Model {} is not available at the provider",
                model
            ));
        }

        let message = serde_json::from_str::<ProviderErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        DiagnosisError::InferenceFailure(format!("Provider error {}: {}", http_status, message))
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn analyze(
        &self,
        system_context: &str,
        prompt: &str,
        media: &NormalizedMedia,
    ) -> Result<String, DiagnosisError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: media.mime.clone(),
                            data: BASE64.encode(&media.bytes),
                        },
                    },
                ],
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: system_context.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        tracing::debug!(model = %self.model, mime = %media.mime, "Sending analysis request");

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DiagnosisError::InferenceFailure(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_failure(&self.model, status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DiagnosisError::InferenceFailure(format!("Parse error: {}", e)))?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(DiagnosisError::InferenceFailure(
                "Provider returned no text candidates".to_string(),
            ));
        }

        tracing::info!(model = %self.model, chars = text.len(), "Received analysis response");

        Ok(text)
    }
}
