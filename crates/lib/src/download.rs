//! Blocking file downloads with SHA-256 verification.
//!
//! Sources are `http(s)://` URLs, `file://` URLs or plain local paths. A
//! destination that already holds a file with the expected hash is reused.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{DownloadDialog, DownloadFile};

#[derive(Debug, Error)]
pub enum DownloadError {
  #[error("no destination for {url}")]
  NoDestination { url: String },

  #[error("fetch failed for {url}: {message}")]
  Fetch { url: String, message: String },

  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  #[error("io error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

fn sha256_hex(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> DownloadError + '_ {
  move |source| DownloadError::Io {
    path: path.to_path_buf(),
    source,
  }
}

fn fetch_bytes(url: &str) -> Result<Vec<u8>, DownloadError> {
  if url.starts_with("http://") || url.starts_with("https://") {
    let fetch_error = |message: String| DownloadError::Fetch {
      url: url.to_string(),
      message,
    };
    let response = reqwest::blocking::get(url).map_err(|e| fetch_error(e.to_string()))?;
    if !response.status().is_success() {
      return Err(fetch_error(format!("HTTP {}", response.status())));
    }
    return response
      .bytes()
      .map(|b| b.to_vec())
      .map_err(|e| fetch_error(e.to_string()));
  }

  let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
  fs::read(path).map_err(|e| DownloadError::Fetch {
    url: url.to_string(),
    message: e.to_string(),
  })
}

/// Fetch one file into its destination, relative paths resolved against
/// `base_dir`. Returns the destination path.
pub fn download_file(file: &DownloadFile, base_dir: &Path) -> Result<PathBuf, DownloadError> {
  let url = file.source_url.as_str();
  if file.destination_path.as_os_str().is_empty() {
    return Err(DownloadError::NoDestination { url: url.to_string() });
  }
  let dest = base_dir.join(&file.destination_path);
  let expected = file.sha256.as_deref().map(str::to_ascii_lowercase);

  if let Some(expected) = &expected
    && let Ok(existing) = fs::read(&dest)
  {
    let actual = sha256_hex(&existing);
    if &actual == expected {
      info!(path = %dest.display(), "using cached file");
      return Ok(dest);
    }
    debug!(expected = %expected, actual = %actual, "cached file hash mismatch, re-downloading");
  }

  info!(url = %url, dest = %dest.display(), "downloading");
  let bytes = fetch_bytes(url)?;

  if let Some(expected) = expected {
    let actual = sha256_hex(&bytes);
    if actual != expected {
      return Err(DownloadError::HashMismatch {
        url: url.to_string(),
        expected,
        actual,
      });
    }
  }

  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent).map_err(io_error(parent))?;
  }
  let temp = dest.with_extension("part");
  fs::write(&temp, &bytes).map_err(io_error(&temp))?;
  fs::rename(&temp, &dest).map_err(io_error(&dest))?;

  debug!(path = %dest.display(), size = bytes.len(), "download complete");
  Ok(dest)
}

/// Fetch every file of `dialog` in order, stopping at the first failure.
pub fn run_download(dialog: &DownloadDialog, base_dir: &Path) -> Result<Vec<PathBuf>, DownloadError> {
  if !dialog.caption.is_empty() {
    info!(caption = %dialog.caption, files = dialog.files.len(), "starting download");
  }
  dialog.files.iter().map(|file| download_file(file, base_dir)).collect()
}
