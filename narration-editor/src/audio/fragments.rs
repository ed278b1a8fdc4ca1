//! Fragment file naming and temp/final storage.
//!
//! Fresh fragments land in a cache directory; the user keeps the ones they
//! want by copying them into the final directory, where name collisions get
//! a `(n)` suffix instead of overwriting.

use super::AudioFragment;
use crate::error::{NarrationError, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Base name used when the text has no source file.
const UNTITLED: &str = "untitled";

/// Extension of synthesized fragments.
const FRAGMENT_EXTENSION: &str = "mp3";

/// Get the temp directory for fresh fragments: `<cache>/narration-editor`.
pub fn default_temp_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .or_else(dirs::home_dir)
        .map(|d| d.join("narration-editor"))
        .ok_or(NarrationError::NoDirectory("cache"))
}

/// Get the final directory for kept fragments: `<downloads>/narration`.
pub fn default_final_dir() -> Result<PathBuf> {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .map(|d| d.join("narration"))
        .ok_or(NarrationError::NoDirectory("downloads"))
}

/// 1-based line number containing the character at `selection_start`.
pub fn start_line(text: &str, selection_start: usize) -> usize {
    text.chars()
        .take(selection_start)
        .filter(|c| *c == '\n')
        .count()
        + 1
}

/// Base name for fragments: the source file stem, or `untitled`.
pub fn fragment_base_name(source_path: Option<&Path>) -> String {
    source_path
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// File name for a fragment: `{base}{start_line}_{NNN}.mp3`, `NNN` 1-based.
pub fn fragment_file_name(base: &str, start_line: usize, index: usize) -> String {
    format!(
        "{}{}_{:03}.{}",
        base,
        start_line,
        index + 1,
        FRAGMENT_EXTENSION
    )
}

/// Pick a file name in `dir` that does not exist yet: `name.ext`, `name(1).ext`, ...
pub fn unique_filename(dir: &Path, filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut candidate = filename.to_string();
    let mut counter = 1;
    while dir.join(&candidate).exists() {
        candidate = format!("{}({}){}", stem, counter, ext);
        counter += 1;
    }
    candidate
}

/// Temp and final directories for fragment files.
#[derive(Debug, Clone)]
pub struct FragmentStore {
    temp_dir: PathBuf,
    final_dir: PathBuf,
}

impl FragmentStore {
    pub fn new(temp_dir: impl Into<PathBuf>, final_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            final_dir: final_dir.into(),
        }
    }

    /// Store rooted at the platform cache and downloads directories.
    pub fn with_default_dirs() -> Result<Self> {
        Ok(Self::new(default_temp_dir()?, default_final_dir()?))
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn final_dir(&self) -> &Path {
        &self.final_dir
    }

    /// Write fragments to the temp directory, returning paths in fragment order.
    pub fn write_fragments(
        &self,
        base: &str,
        start_line: usize,
        fragments: &[AudioFragment],
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.temp_dir)?;

        let mut paths = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let path = self
                .temp_dir
                .join(fragment_file_name(base, start_line, fragment.index));
            fs::write(&path, &fragment.audio)?;
            debug!(
                "Wrote {} ({} bytes)",
                path.display(),
                fragment.audio.len()
            );
            paths.push(path);
        }

        Ok(paths)
    }

    /// Copy a temp fragment into the final directory without overwriting.
    pub fn save_to_final(&self, temp_file: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.final_dir)?;

        let filename = temp_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                NarrationError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", temp_file.display()),
                ))
            })?;

        let final_path = self
            .final_dir
            .join(unique_filename(&self.final_dir, &filename));
        fs::copy(temp_file, &final_path)?;

        info!("Saved {} -> {}", temp_file.display(), final_path.display());
        Ok(final_path)
    }

    /// Delete a temp fragment if it still exists.
    pub fn discard(&self, temp_file: &Path) -> Result<()> {
        if temp_file.exists() {
            fs::remove_file(temp_file)?;
            debug!("Removed {}", temp_file.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fragment(index: usize, audio: &[u8]) -> AudioFragment {
        AudioFragment {
            index,
            text: String::new(),
            audio: audio.to_vec(),
        }
    }

    #[test]
    fn test_start_line() {
        let text = "one\ntwo\nthree";
        assert_eq!(start_line(text, 0), 1);
        assert_eq!(start_line(text, 3), 1);
        assert_eq!(start_line(text, 4), 2);
        assert_eq!(start_line(text, 8), 3);
        assert_eq!(start_line(text, 100), 3);
    }

    #[test]
    fn test_start_line_counts_chars() {
        let text = "東京\n大阪";
        assert_eq!(start_line(text, 3), 2);
    }

    #[test]
    fn test_fragment_base_name() {
        assert_eq!(
            fragment_base_name(Some(Path::new("/scripts/chapter1.md"))),
            "chapter1"
        );
        assert_eq!(fragment_base_name(None), "untitled");
    }

    #[test]
    fn test_fragment_file_name() {
        assert_eq!(fragment_file_name("chapter1", 12, 0), "chapter112_001.mp3");
        assert_eq!(fragment_file_name("untitled", 1, 41), "untitled1_042.mp3");
        assert_eq!(fragment_file_name("a", 1, 999), "a1_1000.mp3");
    }

    #[test]
    fn test_unique_filename() {
        let dir = TempDir::new().unwrap();
        assert_eq!(unique_filename(dir.path(), "a_001.mp3"), "a_001.mp3");

        fs::write(dir.path().join("a_001.mp3"), b"x").unwrap();
        assert_eq!(unique_filename(dir.path(), "a_001.mp3"), "a_001(1).mp3");

        fs::write(dir.path().join("a_001(1).mp3"), b"x").unwrap();
        assert_eq!(unique_filename(dir.path(), "a_001.mp3"), "a_001(2).mp3");
    }

    #[test]
    fn test_write_save_discard() {
        let temp = TempDir::new().unwrap();
        let store = FragmentStore::new(temp.path().join("cache"), temp.path().join("final"));

        let paths = store
            .write_fragments("script", 3, &[fragment(0, b"one"), fragment(1, b"two")])
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("script3_001.mp3"));
        assert!(paths[1].ends_with("script3_002.mp3"));
        assert_eq!(fs::read(&paths[1]).unwrap(), b"two");

        let first = store.save_to_final(&paths[0]).unwrap();
        let second = store.save_to_final(&paths[0]).unwrap();
        assert!(first.ends_with("script3_001.mp3"));
        assert!(second.ends_with("script3_001(1).mp3"));
        assert_eq!(fs::read(&second).unwrap(), b"one");

        store.discard(&paths[0]).unwrap();
        assert!(!paths[0].exists());
        // Discarding a missing file is fine
        store.discard(&paths[0]).unwrap();
    }
}
