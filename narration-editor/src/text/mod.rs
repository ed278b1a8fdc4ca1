//! Text processing for narration: markdown cleaning, chunking, and ruby filters.

pub mod chunker;
pub mod cleaner;
pub mod ruby;

pub use chunker::{DEFAULT_MAX_CHARS, split_text};
pub use cleaner::normalize;

use std::path::Path;

/// Format of the text handed to the narration pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// Plain prose, passed through unchanged
    #[default]
    Plain,
    /// Markdown, cleaned before chunking
    Markdown,
}

impl SourceFormat {
    /// Derive the format from a file extension (`.md` / `.markdown`).
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            _ => Self::Plain,
        }
    }

    /// Prepare text for chunking according to this format.
    pub fn prepare(self, text: &str) -> String {
        match self {
            Self::Markdown => normalize(text),
            Self::Plain => text.to_string(),
        }
    }
}
