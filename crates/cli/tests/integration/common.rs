//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the configuration and
/// the data directory with the resume marker.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Copies the fixture to `setup.json` in a temporary directory.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    std::fs::write(&env.config_path, fixture_content(name)).unwrap();
    env
  }

  /// Writes `value` as the configuration.
  pub fn write_config(&self, value: &serde_json::Value) {
    std::fs::write(&self.config_path, serde_json::to_string_pretty(value).unwrap()).unwrap();
  }

  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("setup.json");
    Self { temp, config_path }
  }

  /// Path below the temp directory.
  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Data path for the resume marker.
  pub fn data_path(&self) -> PathBuf {
    let p = self.temp.path().join("data");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn resume_marker(&self) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(self.data_path().join("resume.json")).ok()?;
    Some(serde_json::from_str(&content).unwrap())
  }

  /// Get a Command for the bootstrap binary with an isolated data directory.
  pub fn bootstrap_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("bootstrap");
    cmd.env("BOOTSTRAP_DATA_DIR", self.data_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// `bootstrap run --config <setup.json>` followed by `args`.
  pub fn run(&self, args: &[&str]) -> Command {
    let mut cmd = self.bootstrap_cmd();
    cmd.arg("run").arg("--config").arg(&self.config_path).args(args);
    cmd
  }

  /// `bootstrap plan --config <setup.json>` followed by `args`.
  pub fn plan(&self, args: &[&str]) -> Command {
    let mut cmd = self.bootstrap_cmd();
    cmd.arg("plan").arg("--config").arg(&self.config_path).args(args);
    cmd
  }
}

/// Process exit status for `code` as the platform reports it. POSIX keeps
/// the low 8 bits only.
pub fn exit_status(code: i32) -> i32 {
  if cfg!(unix) { code & 0xff } else { code }
}

/// Shell command creating `path`.
pub fn touch_command(path: &Path) -> String {
  if cfg!(windows) {
    format!("type nul > \"{}\"", path.display())
  } else {
    format!("touch '{}'", path.display())
  }
}

/// Shell command removing `path`.
pub fn remove_command(path: &Path) -> String {
  if cfg!(windows) {
    format!("del /q \"{}\"", path.display())
  } else {
    format!("rm -f '{}'", path.display())
  }
}
