//! Error types for the narration pipeline and its file formats.

use speech_client::SpeechError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarrationError {
    #[error("Chunk size must be a positive number of characters")]
    InvalidChunkSize,

    #[error("Speech synthesis failed on chunk {}: {source}", .chunk + 1)]
    Synthesis {
        /// Zero-based index of the chunk that failed
        chunk: usize,
        #[source]
        source: SpeechError,
    },

    #[error("Invalid project file: {0}")]
    InvalidProjectFile(String),

    #[error("Dictionary index {index} out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No dictionary entry is being edited")]
    NotEditing,

    #[error("Could not determine {0} directory")]
    NoDirectory(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, NarrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_error_reports_one_based_chunk() {
        let err = NarrationError::Synthesis {
            chunk: 2,
            source: SpeechError::ApiError {
                message: "bad voice".to_string(),
                status_code: Some(400),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("chunk 3"), "{}", msg);
        assert!(msg.contains("bad voice"), "{}", msg);
    }
}
