//! Shared helpers for library integration tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use bootstrap_lib::component::{ComponentDef, ComponentState, PortableInstallCheck};
use bootstrap_lib::config::{ConfigSource, DownloadDialog};
use bootstrap_lib::engine::{
  CommandRequest, CommandRunner, ExecuteError, Frontend, InstallCheck, LanguageSelection, MessageKind, SystemControl,
  SystemError,
};
use bootstrap_lib::platform::lcid::{Lcid, LcidType};
use bootstrap_lib::process::ShellRunner;
use bootstrap_lib::resume::{ResumeMarker, ResumeStore};
use bootstrap_lib::session::Sequence;
use tempfile::TempDir;

/// A non-interactive host that runs real commands, checks real files and
/// keeps its resume marker in a temporary directory.
pub struct LocalHost {
  pub base_dir: PathBuf,
  pub resume: ResumeStore,
  pub messages: Vec<(MessageKind, String)>,
  pub reboots: usize,
  runner: ShellRunner,
}

impl LocalHost {
  pub fn new(dir: &TempDir) -> Self {
    Self {
      base_dir: dir.path().to_path_buf(),
      resume: ResumeStore::new(dir.path().join("state")),
      messages: Vec::new(),
      reboots: 0,
      runner: ShellRunner,
    }
  }
}

impl Frontend for LocalHost {
  fn embedded_configuration(&self) -> Option<ConfigSource> {
    None
  }

  fn select_language(&mut self, _languages: &[String]) -> LanguageSelection {
    LanguageSelection::NotSelected
  }

  fn on_version_error(&mut self, _version: &str, _source: &str) -> bool {
    true
  }

  fn show_message(&mut self, kind: MessageKind, text: &str) {
    self.messages.push((kind, text.to_string()));
  }

  fn confirm(&mut self, _text: &str, default: bool) -> bool {
    default
  }

  fn choose_components(&mut self, _sequence: Sequence, _components: &[ComponentState]) -> Option<BTreeSet<String>> {
    None
  }

  fn run_download(&mut self, dialog: &DownloadDialog) -> bool {
    bootstrap_lib::download::run_download(dialog, &self.base_dir).is_ok()
  }

  fn hide(&mut self) {}
}

impl InstallCheck for LocalHost {
  fn is_installed(&self, component: &ComponentDef) -> bool {
    PortableInstallCheck.is_installed(component)
  }
}

impl CommandRunner for LocalHost {
  fn execute(&mut self, request: &CommandRequest) -> Result<Option<i32>, ExecuteError> {
    self.runner.execute(request)
  }
}

impl SystemControl for LocalHost {
  fn is_elevation_supported(&self) -> bool {
    false
  }

  fn is_user_admin(&self) -> bool {
    true
  }

  fn is_elevated(&self) -> bool {
    true
  }

  fn detect_lcid(&self, _lcid_type: LcidType) -> Option<Lcid> {
    Some(1033)
  }

  fn restart_elevated(&mut self, _args: &[String]) -> Result<bool, SystemError> {
    Ok(false)
  }

  fn reboot(&mut self) -> Result<(), SystemError> {
    self.reboots += 1;
    Ok(())
  }

  fn write_resume_marker(&mut self, marker: &ResumeMarker) -> Result<(), SystemError> {
    Ok(self.resume.save(marker)?)
  }

  fn clear_resume_marker(&mut self) -> Result<(), SystemError> {
    self.resume.clear()?;
    Ok(())
  }
}

/// Shell command creating an empty file at `path`.
#[cfg(unix)]
pub fn touch(path: &Path) -> String {
  format!("touch '{}'", path.display())
}

#[cfg(windows)]
pub fn touch(path: &Path) -> String {
  format!("type nul > \"{}\"", path.display())
}

/// Shell command removing the file at `path`.
#[cfg(unix)]
pub fn remove(path: &Path) -> String {
  format!("rm -f '{}'", path.display())
}

#[cfg(windows)]
pub fn remove(path: &Path) -> String {
  format!("del /F /Q \"{}\"", path.display())
}

/// Write `json` to `name` in `dir`.
pub fn write_config(dir: &TempDir, name: &str, json: &serde_json::Value) -> PathBuf {
  let path = dir.path().join(name);
  std::fs::write(&path, serde_json::to_string_pretty(json).unwrap()).unwrap();
  path
}

/// A component installed by creating `marker` and detected by its presence.
pub fn marker_component(id: &str, marker: &Path) -> serde_json::Value {
  serde_json::json!({
    "id": id,
    "install": { "full": touch(marker) },
    "uninstall": { "full": remove(marker) },
    "install_checks": [{ "type": "file", "path": marker }]
  })
}
