//! Test utilities for bootstrap-lib.
//!
//! [`ScriptedHost`] stands in for a real host: answers are scripted up front
//! and everything the engine asks of it is recorded.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::component::{ComponentDef, ComponentState};
use crate::config::{ConfigSource, DownloadDialog, InstallConfiguration};
use crate::engine::{
  CommandRequest, CommandRunner, ExecuteError, Frontend, InstallCheck, LanguageSelection, MessageKind, SystemControl,
  SystemError,
};
use crate::platform::lcid::{Lcid, LcidType};
use crate::resume::ResumeMarker;
use crate::session::Sequence;

/// A host whose answers are scripted.
///
/// Commands of the form `install <id>` and `uninstall <id>` that exit 0 add
/// or remove `<id>` from the installed set, so re-evaluation sees the effect.
#[derive(Debug)]
pub struct ScriptedHost {
  pub embedded: Option<ConfigSource>,
  pub language: LanguageSelection,
  pub abort_on_version_error: bool,
  /// Answers for `confirm`, the default answer once exhausted.
  pub answers: VecDeque<bool>,
  /// Selections for `choose_components`, closes once exhausted.
  pub selections: VecDeque<Option<BTreeSet<String>>>,
  pub download_ok: bool,
  pub installed: BTreeSet<String>,
  /// Exit codes by command, 0 when absent.
  pub exit_codes: BTreeMap<String, i32>,
  pub elevation_supported: bool,
  pub admin: bool,
  pub elevated: bool,
  /// Result of `restart_elevated`, an error when `None`.
  pub elevate_result: Option<bool>,
  pub lcid: Option<Lcid>,

  pub messages: Vec<(MessageKind, String)>,
  pub questions: Vec<String>,
  /// Dialog captions of the configurations begun, in order.
  pub configurations: Vec<String>,
  pub presented: Vec<(Sequence, Vec<ComponentState>)>,
  pub downloads: Vec<DownloadDialog>,
  pub executed: Vec<CommandRequest>,
  pub version_errors: Vec<String>,
  pub elevated_restarts: Vec<Vec<String>>,
  pub hidden: bool,
  pub reboots: usize,
  pub marker: Option<ResumeMarker>,
  pub markers_cleared: usize,
}

impl Default for ScriptedHost {
  fn default() -> Self {
    Self {
      embedded: None,
      language: LanguageSelection::NotSelected,
      abort_on_version_error: true,
      answers: VecDeque::new(),
      selections: VecDeque::new(),
      download_ok: true,
      installed: BTreeSet::new(),
      exit_codes: BTreeMap::new(),
      elevation_supported: true,
      admin: true,
      elevated: true,
      elevate_result: Some(true),
      lcid: Some(1033),
      messages: Vec::new(),
      questions: Vec::new(),
      configurations: Vec::new(),
      presented: Vec::new(),
      downloads: Vec::new(),
      executed: Vec::new(),
      version_errors: Vec::new(),
      elevated_restarts: Vec::new(),
      hidden: false,
      reboots: 0,
      marker: None,
      markers_cleared: 0,
    }
  }
}

impl ScriptedHost {
  /// A host whose embedded configuration is `content`.
  pub fn with_config(content: &str) -> Self {
    Self {
      embedded: Some(ConfigSource::Inline {
        name: "test.json".to_string(),
        content: content.to_string(),
      }),
      ..Default::default()
    }
  }

  pub fn exit_code(mut self, command: &str, code: i32) -> Self {
    self.exit_codes.insert(command.to_string(), code);
    self
  }

  pub fn installed(mut self, ids: &[&str]) -> Self {
    self.installed.extend(ids.iter().map(|id| id.to_string()));
    self
  }

  pub fn select(mut self, ids: &[&str]) -> Self {
    self.selections.push_back(Some(ids.iter().map(|id| id.to_string()).collect()));
    self
  }

  pub fn answer(mut self, answer: bool) -> Self {
    self.answers.push_back(answer);
    self
  }

  pub fn commands(&self) -> Vec<&str> {
    self.executed.iter().map(|r| r.command.as_str()).collect()
  }

  pub fn messages_of(&self, kind: MessageKind) -> Vec<&str> {
    self
      .messages
      .iter()
      .filter(|(k, _)| *k == kind)
      .map(|(_, text)| text.as_str())
      .collect()
  }
}

impl Frontend for ScriptedHost {
  fn embedded_configuration(&self) -> Option<ConfigSource> {
    self.embedded.clone()
  }

  fn select_language(&mut self, _languages: &[String]) -> LanguageSelection {
    self.language.clone()
  }

  fn on_version_error(&mut self, version: &str, _source: &str) -> bool {
    self.version_errors.push(version.to_string());
    self.abort_on_version_error
  }

  fn show_message(&mut self, kind: MessageKind, text: &str) {
    self.messages.push((kind, text.to_string()));
  }

  fn confirm(&mut self, text: &str, default: bool) -> bool {
    self.questions.push(text.to_string());
    self.answers.pop_front().unwrap_or(default)
  }

  fn begin_configuration(&mut self, config: &InstallConfiguration) {
    self.configurations.push(config.dialog_caption.clone());
  }

  fn choose_components(&mut self, sequence: Sequence, components: &[ComponentState]) -> Option<BTreeSet<String>> {
    self.presented.push((sequence, components.to_vec()));
    self.selections.pop_front().flatten()
  }

  fn run_download(&mut self, dialog: &DownloadDialog) -> bool {
    self.downloads.push(dialog.clone());
    self.download_ok
  }

  fn hide(&mut self) {
    self.hidden = true;
  }
}

impl InstallCheck for ScriptedHost {
  fn is_installed(&self, component: &ComponentDef) -> bool {
    self.installed.contains(&component.id)
  }
}

impl CommandRunner for ScriptedHost {
  fn execute(&mut self, request: &CommandRequest) -> Result<Option<i32>, ExecuteError> {
    if request.command.trim().is_empty() {
      return Err(ExecuteError::EmptyCommand);
    }
    self.executed.push(request.clone());
    if !request.wait {
      return Ok(None);
    }

    let code = self.exit_codes.get(&request.command).copied().unwrap_or(0);
    if code == 0 {
      if let Some(id) = request.command.strip_prefix("install ") {
        self.installed.insert(id.to_string());
      } else if let Some(id) = request.command.strip_prefix("uninstall ") {
        self.installed.remove(id);
      }
    }
    Ok(Some(code))
  }
}

impl SystemControl for ScriptedHost {
  fn is_elevation_supported(&self) -> bool {
    self.elevation_supported
  }

  fn is_user_admin(&self) -> bool {
    self.admin
  }

  fn is_elevated(&self) -> bool {
    self.elevated
  }

  fn detect_lcid(&self, _lcid_type: LcidType) -> Option<Lcid> {
    self.lcid
  }

  fn restart_elevated(&mut self, args: &[String]) -> Result<bool, SystemError> {
    self.elevated_restarts.push(args.to_vec());
    self
      .elevate_result
      .ok_or_else(|| SystemError::Elevation(std::io::Error::other("elevation unavailable")))
  }

  fn reboot(&mut self) -> Result<(), SystemError> {
    self.reboots += 1;
    Ok(())
  }

  fn write_resume_marker(&mut self, marker: &ResumeMarker) -> Result<(), SystemError> {
    self.marker = Some(marker.clone());
    Ok(())
  }

  fn clear_resume_marker(&mut self) -> Result<(), SystemError> {
    self.marker = None;
    self.markers_cleared += 1;
    Ok(())
  }
}

/// Shell command exiting with `code`.
pub fn exit_command(code: i32) -> String {
  format!("exit {}", code)
}

/// Shell command creating an empty file at `path`.
#[cfg(unix)]
pub fn touch_command(path: &std::path::Path) -> String {
  format!("touch '{}'", path.display())
}

#[cfg(windows)]
pub fn touch_command(path: &std::path::Path) -> String {
  format!("type nul > \"{}\"", path.display())
}
