use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::check::{CheckMode, InstallCheckDef};
use crate::config::{CommandSet, DownloadDialog};
use crate::consts::EXIT_REBOOT_REQUIRED;
use crate::filter::PlatformFilter;
use crate::session::Sequence;

fn yes() -> bool {
  true
}

/// One installable unit as declared in a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentDef {
  pub id: String,
  pub display_name: String,
  #[serde(flatten)]
  pub filter: PlatformFilter,

  pub supports_install: bool,
  pub supports_uninstall: bool,
  pub required_install: bool,
  pub required_uninstall: bool,
  pub selected_install: bool,
  pub selected_uninstall: bool,

  pub install: CommandSet,
  pub uninstall: CommandSet,
  pub working_directory: Option<PathBuf>,
  pub hide_window: bool,
  /// Wait for the command to exit; a detached command counts as success.
  pub wait: bool,
  pub disable_wow64_fs_redirection: bool,

  pub success_exit_codes: Vec<i32>,
  /// Exit codes meaning success with a reboot pending.
  pub reboot_exit_codes: Vec<i32>,
  /// Always ask for a reboot after success.
  pub reboot: bool,
  pub must_reboot_required: bool,
  pub reboot_required: String,

  /// Continue-on-error prompt, `{name}` is the display name.
  pub failed_exec_command_continue: String,
  pub allow_continue_on_error: bool,
  pub default_continue_on_error: bool,
  pub install_completed: String,

  pub status_installed: String,
  pub status_notinstalled: String,

  pub download: Option<DownloadDialog>,
  pub install_checks: Vec<InstallCheckDef>,
  pub install_check_mode: CheckMode,
}

impl Default for ComponentDef {
  fn default() -> Self {
    Self {
      id: String::new(),
      display_name: String::new(),
      filter: PlatformFilter::default(),
      supports_install: yes(),
      supports_uninstall: yes(),
      required_install: yes(),
      required_uninstall: yes(),
      selected_install: yes(),
      selected_uninstall: yes(),
      install: CommandSet::default(),
      uninstall: CommandSet::default(),
      working_directory: None,
      hide_window: false,
      wait: yes(),
      disable_wow64_fs_redirection: false,
      success_exit_codes: vec![0],
      reboot_exit_codes: vec![EXIT_REBOOT_REQUIRED],
      reboot: false,
      must_reboot_required: false,
      reboot_required: String::new(),
      failed_exec_command_continue: String::new(),
      allow_continue_on_error: yes(),
      default_continue_on_error: false,
      install_completed: String::new(),
      status_installed: String::new(),
      status_notinstalled: String::new(),
      download: None,
      install_checks: Vec::new(),
      install_check_mode: CheckMode::All,
    }
  }
}

/// How a component command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
  Success,
  SuccessRebootRequired,
  Failure,
}

impl ComponentDef {
  /// Display name, falling back to the id.
  pub fn name(&self) -> &str {
    if self.display_name.is_empty() { &self.id } else { &self.display_name }
  }

  pub fn supports(&self, sequence: Sequence) -> bool {
    match sequence {
      Sequence::Install => self.supports_install,
      Sequence::Uninstall => self.supports_uninstall,
    }
  }

  pub fn is_required(&self, sequence: Sequence) -> bool {
    match sequence {
      Sequence::Install => self.required_install,
      Sequence::Uninstall => self.required_uninstall,
    }
  }

  pub fn is_selected(&self, sequence: Sequence) -> bool {
    match sequence {
      Sequence::Install => self.selected_install,
      Sequence::Uninstall => self.selected_uninstall,
    }
  }

  pub fn commands(&self, sequence: Sequence) -> &CommandSet {
    match sequence {
      Sequence::Install => &self.install,
      Sequence::Uninstall => &self.uninstall,
    }
  }

  /// Classify the exit code of a component command. `None` is a detached
  /// command and counts as success.
  pub fn disposition(&self, code: Option<i32>) -> ExitDisposition {
    let Some(code) = code else {
      return if self.reboot {
        ExitDisposition::SuccessRebootRequired
      } else {
        ExitDisposition::Success
      };
    };

    if self.reboot_exit_codes.contains(&code) {
      ExitDisposition::SuccessRebootRequired
    } else if self.success_exit_codes.contains(&code) {
      if self.reboot {
        ExitDisposition::SuccessRebootRequired
      } else {
        ExitDisposition::Success
      }
    } else {
      ExitDisposition::Failure
    }
  }

  /// The continue-on-error prompt with the component name substituted.
  pub fn continue_message(&self, default_template: &str) -> String {
    let template = if self.failed_exec_command_continue.is_empty() {
      default_template
    } else {
      &self.failed_exec_command_continue
    };
    template.replace("{name}", self.name())
  }
}

/// Evaluated state of a component for the active sequence. Recomputed on
/// every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentState {
  /// Position of the component in its configuration.
  pub index: usize,
  pub id: String,
  /// Display name followed by the status text.
  pub description: String,
  pub installed: bool,
  pub required: bool,
  pub checked: bool,
  /// The user may not change `checked`.
  pub disabled: bool,
  pub visible: bool,
}
