//! Resume-after-reboot marker.
//!
//! When a reboot is pending the engine stores the command line that continues
//! the run. The marker lives in the data directory:
//!
//! ```text
//! {data_dir}/
//! └── resume.json     # ResumeMarker
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::platform::paths::data_dir;

const RESUME_FILENAME: &str = "resume.json";

/// The command to run after the next restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeMarker {
  /// Program followed by its arguments.
  pub command_line: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ResumeError {
  #[error("failed to create directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to read resume marker: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write resume marker: {0}")]
  Write(#[source] io::Error),

  #[error("failed to remove resume marker: {0}")]
  Remove(#[source] io::Error),

  #[error("failed to parse resume marker: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize resume marker: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// Reads and writes the resume marker.
#[derive(Debug, Clone)]
pub struct ResumeStore {
  base_path: PathBuf,
}

impl ResumeStore {
  pub fn new(base_path: PathBuf) -> Self {
    Self { base_path }
  }

  /// Store in the platform data directory.
  pub fn default_store() -> Self {
    Self::new(data_dir())
  }

  pub fn path(&self) -> PathBuf {
    self.base_path.join(RESUME_FILENAME)
  }

  /// Returns `Ok(None)` when no marker is stored.
  pub fn load(&self) -> Result<Option<ResumeMarker>, ResumeError> {
    let content = match fs::read_to_string(self.path()) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(ResumeError::Read(e)),
    };
    serde_json::from_str(&content).map(Some).map_err(ResumeError::Parse)
  }

  /// Write the marker atomically (temp file, then rename).
  pub fn save(&self, marker: &ResumeMarker) -> Result<(), ResumeError> {
    fs::create_dir_all(&self.base_path).map_err(ResumeError::CreateDir)?;

    let path = self.path();
    let temp_path = self.base_path.join(format!("{}.tmp", RESUME_FILENAME));

    let content = serde_json::to_string_pretty(marker).map_err(ResumeError::Serialize)?;
    fs::write(&temp_path, &content).map_err(ResumeError::Write)?;
    fs::rename(&temp_path, &path).map_err(ResumeError::Write)?;

    info!(path = %path.display(), "resume marker written");
    Ok(())
  }

  /// Remove the marker. Returns whether one existed.
  pub fn clear(&self) -> Result<bool, ResumeError> {
    match fs::remove_file(self.path()) {
      Ok(()) => {
        debug!(path = %self.path().display(), "resume marker removed");
        Ok(true)
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(ResumeError::Remove(e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn marker() -> ResumeMarker {
    ResumeMarker {
      command_line: vec!["bootstrap".to_string(), "run".to_string(), "--reboot".to_string()],
    }
  }

  #[test]
  fn load_without_marker_is_none() {
    let dir = TempDir::new().unwrap();
    let store = ResumeStore::new(dir.path().to_path_buf());
    assert!(store.load().unwrap().is_none());
  }

  #[test]
  fn save_creates_directory_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let store = ResumeStore::new(dir.path().join("nested"));

    store.save(&marker()).unwrap();

    assert_eq!(store.load().unwrap(), Some(marker()));
    assert!(!dir.path().join("nested").join("resume.json.tmp").exists());
  }

  #[test]
  fn clear_reports_whether_marker_existed() {
    let dir = TempDir::new().unwrap();
    let store = ResumeStore::new(dir.path().to_path_buf());

    assert!(!store.clear().unwrap());
    store.save(&marker()).unwrap();
    assert!(store.clear().unwrap());
    assert!(store.load().unwrap().is_none());
  }

  #[test]
  fn corrupt_marker_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let store = ResumeStore::new(dir.path().to_path_buf());
    fs::write(store.path(), "not json").unwrap();
    assert!(matches!(store.load(), Err(ResumeError::Parse(_))));
  }
}
