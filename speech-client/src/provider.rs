use async_trait::async_trait;

use crate::error::Result;

/// Default speech model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini-tts";

/// Default voice, also used for legacy project files that carry no voice
pub const DEFAULT_VOICE: &str = "sage";

/// Request to synthesize one piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub input: String,
    pub voice: String,
    pub instructions: String,
    pub model: String,
}

impl SpeechRequest {
    /// Create a request with the default voice and model
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            voice: DEFAULT_VOICE.to_string(),
            instructions: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the voice identifier
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set free-text delivery instructions
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Trait for speech synthesis providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize the request's input, returning raw audio bytes
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Check if the provider is usable (API key set, etc.)
    fn is_available(&self) -> Result<()>;
}
