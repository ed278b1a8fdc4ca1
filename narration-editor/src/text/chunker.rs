//! Text chunking for speech synthesis requests.
//!
//! Lengths are measured in `char`s (Unicode scalar values) for both the
//! packing check and the slicing of over-long lines.

use crate::error::{NarrationError, Result};

/// Default maximum chunk size in characters.
pub const DEFAULT_MAX_CHARS: usize = 1024;

/// Split text into chunks of at most `max_chars` characters.
///
/// Lines are packed greedily, joined by `\n`. A line longer than the budget
/// is sliced into fixed-size pieces, each its own chunk. Empty input yields
/// no chunks, and no chunk is ever empty.
///
/// # Errors
/// `InvalidChunkSize` when `max_chars` is zero.
pub fn split_text(text: &str, max_chars: usize) -> Result<Vec<String>> {
    if max_chars == 0 {
        return Err(NarrationError::InvalidChunkSize);
    }

    let mut chunks = Vec::new();
    let mut current_chunk = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        // Slice long lines, flushing the pending chunk first
        if line_len > max_chars {
            if !current_chunk.is_empty() {
                chunks.push(std::mem::take(&mut current_chunk));
                current_len = 0;
            }
            chunks.extend(hard_split(line, max_chars));
            continue;
        }

        let separator = usize::from(!current_chunk.is_empty());
        if current_len + separator + line_len > max_chars {
            if !current_chunk.is_empty() {
                chunks.push(std::mem::take(&mut current_chunk));
            }
            current_chunk.push_str(line);
            current_len = line_len;
        } else {
            if separator == 1 {
                current_chunk.push('\n');
            }
            current_chunk.push_str(line);
            current_len += separator + line_len;
        }
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    Ok(chunks)
}

/// Hard split text at exact character positions.
fn hard_split(text: &str, max_length: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let chars: Vec<char> = text.chars().collect();

    while start < chars.len() {
        let end = std::cmp::min(start + max_length, chars.len());
        let chunk: String = chars[start..end].iter().collect();
        chunks.push(chunk);
        start = end;
    }

    chunks
}
