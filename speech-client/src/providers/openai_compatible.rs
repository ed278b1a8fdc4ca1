//! OpenAI-compatible speech provider
//!
//! Used for servers that implement the OpenAI `/audio/speech` API:
//! - OpenAI itself
//! - Self-hosted compatible servers (set `base_url`)

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SpeechRequest};

/// Provider for OpenAI-compatible speech APIs
pub struct OpenAICompatibleProvider {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAICompatibleProvider {
    /// Create a new provider
    pub fn new(base_url: &str, api_key: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SpeechError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

// OpenAI API request/error types

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    instructions: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl SpeechProvider for OpenAICompatibleProvider {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>> {
        let body = SpeechBody {
            model: &request.model,
            voice: &request.voice,
            input: &request.input,
            instructions: &request.instructions,
        };

        let url = format!("{}/audio/speech", self.base_url);
        debug!(
            "POST {} (voice={}, {} chars)",
            url,
            request.voice,
            request.input.chars().count()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(SpeechError::RateLimited { retry_after });
            }

            let message =
                if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                    error_response.error.message
                } else {
                    error_text
                };

            return Err(SpeechError::ApiError {
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let audio = response.bytes().await.map_err(|e| SpeechError::ApiError {
            message: format!("Failed to read audio body: {}", e),
            status_code: None,
        })?;

        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio(self.name().to_string()));
        }

        Ok(audio.to_vec())
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn is_available(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(SpeechError::MissingApiKey {
                provider: self.name().to_string(),
                env_var: crate::config::API_KEY_ENV_VAR.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_omits_empty_instructions() {
        let body = SpeechBody {
            model: "gpt-4o-mini-tts",
            voice: "sage",
            input: "hello",
            instructions: "",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini-tts");
        assert_eq!(json["voice"], "sage");
        assert_eq!(json["input"], "hello");
        assert!(json.get("instructions").is_none());
    }

    #[test]
    fn test_body_includes_instructions() {
        let body = SpeechBody {
            model: "gpt-4o-mini-tts",
            voice: "sage",
            input: "hello",
            instructions: "Calm and slow",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["instructions"], "Calm and slow");
    }

    #[test]
    fn test_base_url_normalized() {
        let provider =
            OpenAICompatibleProvider::new("https://api.openai.com/v1/", "sk".to_string(), 30)
                .unwrap();
        assert_eq!(provider.base_url, "https://api.openai.com/v1");
        assert!(provider.is_available().is_ok());
    }

    #[test]
    fn test_blank_key_unavailable() {
        let provider =
            OpenAICompatibleProvider::new("https://api.openai.com/v1", " ".to_string(), 30)
                .unwrap();
        assert!(matches!(
            provider.is_available(),
            Err(SpeechError::MissingApiKey { .. })
        ));
    }
}
