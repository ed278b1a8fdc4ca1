//! Audio fragments produced by narration and their on-disk storage.

pub mod fragments;

pub use fragments::{
    FragmentStore, default_final_dir, default_temp_dir, fragment_base_name, fragment_file_name,
    start_line, unique_filename,
};

/// Audio synthesized for one chunk of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFragment {
    /// Zero-based position of the chunk
    pub index: usize,
    /// The chunk text that was synthesized
    pub text: String,
    /// Raw audio bytes returned by the provider
    pub audio: Vec<u8>,
}
