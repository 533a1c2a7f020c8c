//! Capabilities the engine needs from its surroundings.
//!
//! The engine never touches the terminal, processes or the system directly.
//! A host implements these traits; [`Host`] is their union.

use std::collections::BTreeSet;

use super::types::{CommandRequest, ExecuteError, LanguageSelection, MessageKind, SystemError};
use crate::component::{ComponentDef, ComponentState};
use crate::config::{ConfigSource, DownloadDialog, InstallConfiguration};
use crate::platform::lcid::{Lcid, LcidType};
use crate::resume::ResumeMarker;
use crate::session::Sequence;

/// User interaction.
pub trait Frontend {
  /// The configuration used when no path is given.
  fn embedded_configuration(&self) -> Option<ConfigSource>;

  fn select_language(&mut self, languages: &[String]) -> LanguageSelection;

  /// Called when the configuration was written for another format version.
  /// Returns true to abort.
  fn on_version_error(&mut self, version: &str, source: &str) -> bool;

  /// Called before the components of each applicable configuration are
  /// evaluated and presented.
  fn begin_configuration(&mut self, _config: &InstallConfiguration) {}

  fn show_message(&mut self, kind: MessageKind, text: &str);

  /// Yes/No question.
  fn confirm(&mut self, text: &str, default: bool) -> bool;

  /// Present the evaluated components. Returns the ids the user checked, or
  /// `None` when the user closes without starting.
  fn choose_components(&mut self, sequence: Sequence, components: &[ComponentState]) -> Option<BTreeSet<String>>;

  /// Fetch the files of `dialog`. Returns false on failure.
  fn run_download(&mut self, dialog: &DownloadDialog) -> bool;

  /// Hide the user interface while a completion command runs.
  fn hide(&mut self);
}

/// Decides whether a component is present on the machine.
pub trait InstallCheck {
  fn is_installed(&self, component: &ComponentDef) -> bool;
}

/// Runs external commands.
pub trait CommandRunner {
  /// Returns the exit code, or `None` when the command was detached.
  fn execute(&mut self, request: &CommandRequest) -> Result<Option<i32>, ExecuteError>;
}

/// Privileges, reboots and the resume marker.
pub trait SystemControl {
  fn is_elevation_supported(&self) -> bool;
  fn is_user_admin(&self) -> bool;
  fn is_elevated(&self) -> bool;

  /// Locale of the machine for `lcid_type`, `None` when unknown.
  fn detect_lcid(&self, lcid_type: LcidType) -> Option<Lcid>;

  /// Start an elevated instance with `args`. Returns false when the user
  /// declined.
  fn restart_elevated(&mut self, args: &[String]) -> Result<bool, SystemError>;

  fn reboot(&mut self) -> Result<(), SystemError>;
  fn write_resume_marker(&mut self, marker: &ResumeMarker) -> Result<(), SystemError>;
  fn clear_resume_marker(&mut self) -> Result<(), SystemError>;
}

/// Everything the engine depends on.
pub trait Host: Frontend + InstallCheck + CommandRunner + SystemControl {}

impl<T: Frontend + InstallCheck + CommandRunner + SystemControl> Host for T {}
