//! narration-editor: prepare scripts and narrate them through a speech API.
//!
//! Text flows through an optional markdown cleaner, a line-preserving
//! chunker, and the speech provider, one chunk at a time. Dictionary
//! rewriting and project settings sit alongside the pipeline.

pub mod audio;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod pipeline;
pub mod project;
pub mod text;

pub use error::{NarrationError, Result};
