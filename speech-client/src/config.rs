use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechError};

/// Environment variable consulted before the configured key
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Default base URL for the OpenAI speech endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Provider connection settings, embedded in the host application's config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (optional, the environment variable takes precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL for OpenAI-compatible servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key: environment variable first, then config
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV_VAR).ok())
    }

    /// Resolve the API key given an already-read environment value
    pub fn resolve_api_key_with(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| SpeechError::MissingApiKey {
                provider: "OpenAI".to_string(),
                env_var: API_KEY_ENV_VAR.to_string(),
            })
    }

    /// Whether an API key is available from either source
    pub fn has_api_key(&self) -> bool {
        self.resolve_api_key().is_ok()
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}
