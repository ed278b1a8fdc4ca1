//! Dictionary-based text substitution.
//!
//! Entries are applied longest `from` first, one after another, each over
//! the text produced by the previous entries. A later entry may therefore
//! match text introduced by an earlier replacement, but never the reverse.

mod editor;

pub use editor::DictionaryEditor;

use crate::error::{NarrationError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// A literal find/replace rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Text to find (literal, never a pattern); empty entries are skipped
    pub from: String,
    /// Replacement text
    pub to: String,
}

impl DictionaryEntry {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Result of running a dictionary over some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten text
    pub text: String,
    /// Number of literal replacements performed
    pub replacements: usize,
}

/// Ordered collection of dictionary entries.
///
/// Order matters only for display; application order is by `from` length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small dictionary of old-form kanji and readings, for trying things out.
    pub fn sample() -> Self {
        Self::from(vec![
            DictionaryEntry::new("專門", "専門"),
            DictionaryEntry::new("國語", "国語"),
            DictionaryEntry::new("東京都", "とうきょうと"),
            DictionaryEntry::new("東京", "とうきょう"),
        ])
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DictionaryEntry> {
        self.entries.get(index)
    }

    /// Append an entry at the end.
    pub fn push(&mut self, entry: DictionaryEntry) {
        self.entries.push(entry);
    }

    /// Replace the entry at `index`.
    pub fn update(&mut self, index: usize, entry: DictionaryEntry) -> Result<()> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(NarrationError::IndexOutOfRange { index, len })?;
        *slot = entry;
        Ok(())
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<DictionaryEntry> {
        if index >= self.entries.len() {
            return Err(NarrationError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Apply all entries to `text`.
    pub fn apply(&self, text: &str) -> String {
        apply_dictionary(text, &self.entries)
    }

    /// Count the replacements `apply` would perform.
    pub fn count_replacements(&self, text: &str) -> usize {
        count_replacements(text, &self.entries)
    }

    /// Apply all entries, returning the text and the replacement count.
    pub fn rewrite(&self, text: &str) -> Rewrite {
        rewrite(text, &self.entries)
    }
}

impl From<Vec<DictionaryEntry>> for Dictionary {
    fn from(entries: Vec<DictionaryEntry>) -> Self {
        Self { entries }
    }
}

/// Apply dictionary entries to text, longest pattern first.
///
/// ```
/// use narration_editor::dictionary::{apply_dictionary, DictionaryEntry};
///
/// let dict = [
///     DictionaryEntry::new("東京", "とうきょう"),
///     DictionaryEntry::new("東京都", "とうきょうと"),
/// ];
/// assert_eq!(apply_dictionary("東京都と東京", &dict), "とうきょうとととうきょう");
/// ```
pub fn apply_dictionary(text: &str, entries: &[DictionaryEntry]) -> String {
    rewrite(text, entries).text
}

/// Count the replacements `apply_dictionary` would perform.
///
/// Runs the same sequential rewrite so that text consumed by a longer entry
/// is not counted again for a shorter one.
pub fn count_replacements(text: &str, entries: &[DictionaryEntry]) -> usize {
    rewrite(text, entries).replacements
}

/// Run the entries over `text`, returning the result and replacement count.
pub fn rewrite(text: &str, entries: &[DictionaryEntry]) -> Rewrite {
    if entries.is_empty() {
        return Rewrite {
            text: text.to_string(),
            replacements: 0,
        };
    }

    // Stable: entries of equal length keep their relative order
    let mut sorted: Vec<&DictionaryEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| Reverse(entry.from.chars().count()));

    let mut result = text.to_string();
    let mut replacements = 0;

    for entry in sorted {
        if entry.from.is_empty() {
            continue;
        }

        let occurrences = result.matches(entry.from.as_str()).count();
        if occurrences > 0 {
            result = result.replace(entry.from.as_str(), &entry.to);
            replacements += occurrences;
        }
    }

    Rewrite {
        text: result,
        replacements,
    }
}
