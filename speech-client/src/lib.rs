//! Speech synthesis client library for the narration-editor workspace
//!
//! Provides a single interface over text-to-speech backends:
//! - OpenAI-compatible `/audio/speech` endpoints (direct HTTP)
//! - A configurable mock for tests

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::ProviderConfig;
pub use error::{Result, SpeechError};
pub use provider::{SpeechProvider, SpeechRequest};
pub use providers::{MockProvider, OpenAICompatibleProvider, get_provider};
