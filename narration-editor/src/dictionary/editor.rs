//! Edit-state tracking for interactive dictionary changes.

use super::{Dictionary, DictionaryEntry};
use crate::error::{NarrationError, Result};

/// Wraps a dictionary and tracks at most one entry under edit.
#[derive(Debug, Clone, Default)]
pub struct DictionaryEditor {
    dictionary: Dictionary,
    editing: Option<usize>,
}

impl DictionaryEditor {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            editing: None,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn into_dictionary(self) -> Dictionary {
        self.dictionary
    }

    /// Index of the entry currently under edit, if any.
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Append a new entry.
    pub fn add(&mut self, entry: DictionaryEntry) {
        self.dictionary.push(entry);
    }

    /// Put the entry at `index` under edit, replacing any previous edit state.
    pub fn begin_edit(&mut self, index: usize) -> Result<&DictionaryEntry> {
        let len = self.dictionary.len();
        let entry = self
            .dictionary
            .get(index)
            .ok_or(NarrationError::IndexOutOfRange { index, len })?;
        self.editing = Some(index);
        Ok(entry)
    }

    /// Store the edited entry and leave edit state.
    pub fn commit_edit(&mut self, entry: DictionaryEntry) -> Result<()> {
        let index = self.editing.ok_or(NarrationError::NotEditing)?;
        self.dictionary.update(index, entry)?;
        self.editing = None;
        Ok(())
    }

    /// Leave edit state without changes.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Remove the entry at `index`, keeping the edit state pointed at the same entry.
    pub fn remove(&mut self, index: usize) -> Result<DictionaryEntry> {
        let removed = self.dictionary.remove(index)?;
        self.editing = match self.editing {
            Some(editing) if editing == index => None,
            Some(editing) if editing > index => Some(editing - 1),
            other => other,
        };
        Ok(removed)
    }
}
