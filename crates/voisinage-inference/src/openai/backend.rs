//! OpenAI-compatible vision analyzer implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use voisinage_core::{AIAnalysisResult, Cancellation, Error, Result};

use super::error::{error_message, to_voisinage_error};
use super::types::*;
use crate::config::AnalysisConfig;
use crate::extract::extract_json_object;
use crate::image_prep::{prepare_image, PreparedImage};
use crate::prompts::analysis_prompt;
use crate::retry::sleep_or_cancel;
use crate::sanitize::{finalize, RawAnalysis};
use crate::vision::ItemAnalyzer;

/// Health checks should answer quickly or count as down.
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Item photo analyzer backed by an OpenAI-compatible chat completions API.
///
/// Holds no mutable state; one instance may serve concurrent analyses.
pub struct VisionAnalyzer {
    client: Client,
    config: AnalysisConfig,
}

impl VisionAnalyzer {
    /// Create a new analyzer with the given configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.vision.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "vision",
            url = %config.vision.base_url,
            model = %config.vision.model,
            json_mode = config.vision.json_mode,
            "Initializing vision analyzer"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(AnalysisConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .vision
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("no API key configured for the vision service".to_string())
            })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.vision.base_url.trim_end_matches('/'), path)
    }

    /// Build a request with authentication.
    fn build_request(&self, endpoint: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint(endpoint))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
    }

    /// Assemble the multimodal chat request for one prepared image.
    pub fn chat_request(&self, image: &PreparedImage) -> ChatCompletionRequest {
        let vision = &self.config.vision;
        ChatCompletionRequest {
            model: vision.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: analysis_prompt(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_data_url(),
                        },
                    },
                ],
            }],
            temperature: Some(vision.temperature),
            max_tokens: Some(vision.max_tokens),
            response_format: vision.json_mode.then(ResponseFormat::json_object),
        }
    }

    /// Send the request, retrying on HTTP 429, and return the assistant text.
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
        cancel: &Cancellation,
    ) -> Result<String> {
        let retry = &self.config.retry;
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let exchange = async {
                let response = self
                    .build_request("/chat/completions", api_key)
                    .json(request)
                    .send()
                    .await?;
                let status = response.status();
                let body = response.text().await?;
                Ok::<_, Error>((status, body))
            };

            let (status, body) = tokio::select! {
                result = exchange => result?,
                _ = cancel.cancelled() => return Err(Error::Cancelled),
            };

            if status == StatusCode::TOO_MANY_REQUESTS {
                let (message, _) = error_message(&body);
                if !retry.should_retry(attempt) {
                    warn!(
                        subsystem = "inference",
                        component = "vision",
                        op = "complete",
                        attempts = attempt + 1,
                        "Rate limit retries exhausted"
                    );
                    return Err(Error::RateLimited {
                        attempts: attempt + 1,
                        message,
                    });
                }

                let delay = retry.delay_for_attempt(attempt);
                warn!(
                    subsystem = "inference",
                    component = "vision",
                    op = "complete",
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, backing off"
                );
                sleep_or_cancel(delay, cancel).await?;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                warn!(
                    subsystem = "inference",
                    component = "vision",
                    op = "complete",
                    status = status.as_u16(),
                    "Vision request failed"
                );
                return Err(to_voisinage_error(status.as_u16(), &body));
            }

            let parsed: ChatCompletionResponse = serde_json::from_str(&body)
                .map_err(|e| Error::Analysis(format!("Failed to parse response: {}", e)))?;

            let choice = parsed
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| Error::Analysis("response contained no choices".to_string()))?;
            if choice.finish_reason.as_deref() == Some("length") {
                debug!(
                    subsystem = "inference",
                    component = "vision",
                    "Completion hit max_tokens, output may be truncated"
                );
            }
            return choice
                .message
                .content
                .filter(|content| !content.trim().is_empty())
                .ok_or_else(|| Error::Analysis("response content was empty".to_string()));
        }
    }
}

#[async_trait]
impl ItemAnalyzer for VisionAnalyzer {
    async fn analyze_image_with_cancel(
        &self,
        image: &[u8],
        cancel: &Cancellation,
    ) -> Result<AIAnalysisResult> {
        let api_key = self.api_key()?;

        let prepared = prepare_image(
            image,
            self.config.image.max_dimension,
            self.config.image.jpeg_quality,
        )?;
        let request = self.chat_request(&prepared);

        debug!(
            subsystem = "inference",
            component = "vision",
            op = "analyze_image",
            model = %self.config.vision.model,
            image_bytes = prepared.data.len(),
            "Sending image for analysis"
        );

        let content = self.complete(api_key, &request, cancel).await?;
        let raw = RawAnalysis::from_value(extract_json_object(&content)?)?;
        let result = finalize(raw);

        info!(
            subsystem = "inference",
            component = "vision",
            op = "analyze_image",
            category = %result.category,
            confidence = result.category_confidence.unwrap_or(result.confidence),
            "Image analysis complete"
        );
        Ok(result)
    }

    async fn health_check(&self) -> Result<bool> {
        let mut request = self
            .client
            .get(self.endpoint("/models"))
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS));
        if let Ok(api_key) = self.api_key() {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        match request.send().await {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!(subsystem = "inference", component = "vision", "Health check passed");
                    Ok(true)
                } else {
                    warn!(
                        subsystem = "inference",
                        component = "vision",
                        status = resp.status().as_u16(),
                        "Health check failed"
                    );
                    Ok(false)
                }
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "vision",
                    error = %e,
                    "Health check error"
                );
                Ok(false)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.vision.model
    }
}
