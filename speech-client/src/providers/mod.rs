//! Speech provider implementations

pub mod mock;
mod openai_compatible;

pub use mock::MockProvider;
pub use openai_compatible::OpenAICompatibleProvider;

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::provider::SpeechProvider;

/// Create the configured provider
///
/// Fails with `MissingApiKey` when neither the environment nor the config
/// carries a key.
pub fn get_provider(config: &ProviderConfig) -> Result<Box<dyn SpeechProvider>> {
    let api_key = config.resolve_api_key()?;
    Ok(Box::new(OpenAICompatibleProvider::new(
        config.base_url(),
        api_key,
        config.timeout_secs,
    )?))
}
