//! Imagen step-illustration client
//!
//! Requests exactly one image at a fixed aspect ratio with a minimum
//! safety filter level. The provider may return zero images when its
//! safety filter rejects the prompt; that is a soft outcome, not an error
//! at the transport level.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DiagnosisError;

const IMAGEN_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;
const SAMPLE_COUNT: u32 = 1;
const ASPECT_RATIO: &str = "4:3";
const SAFETY_FILTER_LEVEL: &str = "BLOCK_LOW_AND_ABOVE";

/// Image generation boundary
///
/// Returns the raw bytes of one generated image, or None when the
/// provider filtered the prompt and produced nothing.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<Vec<u8>>, DiagnosisError>;
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct Parameters {
    #[serde(rename = "sampleCount")]
    sample_count: u32,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
    #[serde(rename = "safetyFilterLevel")]
    safety_filter_level: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
}

/// Imagen API client
pub struct ImagenClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ImagenClient {
    pub fn new(api_key: String, model: String) -> Result<Self, DiagnosisError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DiagnosisError::AssetGenerationFailure(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: IMAGEN_BASE_URL.to_string(),
        })
    }
}

#[async_trait]
impl ImageModel for ImagenClient {
    async fn generate(&self, prompt: &str) -> Result<Option<Vec<u8>>, DiagnosisError> {
        let url = format!(
            "{}/models/{}:predict?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = PredictRequest {
            instances: vec![Instance {
                prompt: prompt.to_string(),
            }],
            parameters: Parameters {
                sample_count: SAMPLE_COUNT,
                aspect_ratio: ASPECT_RATIO.to_string(),
                safety_filter_level: SAFETY_FILTER_LEVEL.to_string(),
            },
        };

        tracing::debug!(model = %self.model, "Sending image generation request");

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DiagnosisError::AssetGenerationFailure(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiagnosisError::AssetGenerationFailure(format!(
                "Provider error {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| DiagnosisError::AssetGenerationFailure(format!("Parse error: {}", e)))?;

        let encoded = match parsed
            .predictions
            .into_iter()
            .find_map(|p| p.bytes_base64_encoded)
        {
            Some(e) => e,
            None => {
                tracing::warn!(model = %self.model, "Provider returned no image (filtered?)");
                return Ok(None);
            }
        };

        let bytes = BASE64.decode(encoded.as_bytes()).map_err(|e| {
            DiagnosisError::AssetGenerationFailure(format!("Invalid image payload: {}", e))
        })?;

        tracing::info!(model = %self.model, bytes = bytes.len(), "Received generated image");

        Ok(Some(bytes))
    }
}
