//! Project settings persistence: loading and saving JSON project files.

use super::types::{LoadedProject, ProjectSettings};
use crate::audio::default_final_dir;
use crate::dictionary::DictionaryEntry;
use crate::error::{NarrationError, Result};
use log::info;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Default file name for saved projects.
const DEFAULT_PROJECT_FILE: &str = "project_settings.json";

/// Accepted on-disk shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectFile {
    Settings(ProjectSettings),
    Legacy(Vec<DictionaryEntry>),
}

/// Directory offered for project files (shared with saved audio).
pub fn default_project_dir() -> Result<PathBuf> {
    default_final_dir()
}

/// Default project file path.
pub fn default_project_path() -> Result<PathBuf> {
    Ok(default_project_dir()?.join(DEFAULT_PROJECT_FILE))
}

/// Parse project JSON, accepting the legacy bare-array form.
pub fn parse_project(content: &str) -> Result<LoadedProject> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    match serde_json::from_value::<ProjectFile>(value) {
        Ok(ProjectFile::Settings(settings)) => Ok(LoadedProject {
            settings,
            legacy: false,
        }),
        Ok(ProjectFile::Legacy(entries)) => Ok(LoadedProject {
            settings: ProjectSettings::from_dictionary(entries.into()),
            legacy: true,
        }),
        Err(_) => Err(NarrationError::InvalidProjectFile(
            "expected project settings or a dictionary array of {from, to} entries".to_string(),
        )),
    }
}

/// Load a project file.
pub fn load_project(path: &Path) -> Result<LoadedProject> {
    let content = fs::read_to_string(path)?;
    let loaded = parse_project(&content)?;
    info!("{} from {}", loaded.summary(), path.display());
    Ok(loaded)
}

/// Save project settings as pretty-printed JSON, creating parent directories.
pub fn save_project(path: &Path, settings: &ProjectSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, settings)?;

    info!("Saved project settings to {}", path.display());
    Ok(())
}
