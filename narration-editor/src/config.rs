//! narration configuration: speech defaults and provider connection settings.

use crate::error::{NarrationError, Result};
use crate::text::DEFAULT_MAX_CHARS;
use serde::{Deserialize, Serialize};
use speech_client::ProviderConfig;
use speech_client::provider::{DEFAULT_MODEL, DEFAULT_VOICE};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Default voice when no project overrides it
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Default delivery instructions
    #[serde(default)]
    pub instructions: String,

    /// Speech model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Speech provider connection (`[provider]` table)
    #[serde(default)]
    pub provider: ProviderConfig,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            instructions: String::new(),
            model: default_model(),
            chunk_size: default_chunk_size(),
            provider: ProviderConfig::default(),
        }
    }
}

impl NarrationConfig {
    /// Get the config file path: ~/.config/narration-editor/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| NarrationError::NoDirectory("home"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("narration-editor")
            .join("config.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: NarrationConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
