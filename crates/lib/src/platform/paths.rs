use std::path::PathBuf;

use crate::consts::{APP_NAME, DATA_DIR_ENV};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var_os("USERPROFILE")
    .map(PathBuf::from)
    .unwrap_or_else(std::env::temp_dir)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(std::env::temp_dir)
}

/// Returns the directory for data files for the application
///
/// `BOOTSTRAP_DATA_DIR` takes precedence over the platform location.
#[cfg(windows)]
pub fn data_dir() -> PathBuf {
  if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
    return PathBuf::from(dir);
  }
  std::env::var_os("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(home_dir)
    .join(APP_NAME)
}

/// Returns the directory for data files for the application
///
/// `BOOTSTRAP_DATA_DIR` takes precedence over the platform location.
#[cfg(not(windows))]
pub fn data_dir() -> PathBuf {
  if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
    return PathBuf::from(dir);
  }
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Returns the directory holding the running executable.
pub fn exe_dir() -> Option<PathBuf> {
  let exe = std::env::current_exe().ok()?;
  exe.parent().map(|p| dunce::simplified(p).to_path_buf())
}
