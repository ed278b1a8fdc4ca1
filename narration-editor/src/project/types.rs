//! Project settings types.

use crate::dictionary::Dictionary;
use serde::{Deserialize, Serialize};
use speech_client::provider::DEFAULT_VOICE;

/// Settings saved alongside a narration script.
///
/// Every field is required when reading the object form; files holding only
/// a bare dictionary array are handled by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Voice identifier passed to the speech provider
    pub voice: String,
    /// Free-text delivery instructions
    pub instructions: String,
    /// Substitutions applied to the script before narration
    pub dictionary: Dictionary,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            instructions: String::new(),
            dictionary: Dictionary::new(),
        }
    }
}

impl ProjectSettings {
    /// Settings for a dictionary-only file, with default voice and instructions.
    pub fn from_dictionary(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            ..Self::default()
        }
    }
}

/// A project file as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProject {
    pub settings: ProjectSettings,
    /// True when the file was a bare dictionary array
    pub legacy: bool,
}

impl LoadedProject {
    /// One-line summary for status output.
    pub fn summary(&self) -> String {
        let count = self.settings.dictionary.len();
        if self.legacy {
            format!(
                "Loaded dictionary ({} entries); voice and instructions use defaults",
                count
            )
        } else {
            format!("Loaded project settings (dictionary: {} entries)", count)
        }
    }
}
