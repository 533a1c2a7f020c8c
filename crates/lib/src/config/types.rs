//! Typed configuration documents.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::control::Control;
use crate::component::ComponentDef;
use crate::filter::PlatformFilter;
use crate::platform::lcid::{Lcid, LcidType};
use crate::session::{Sequence, UiLevel};

fn yes() -> bool {
  true
}

/// Root of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
  /// Format version the file was written for, unchecked when absent.
  pub version: Option<String>,
  pub show_language_selector: bool,
  pub lcid_type: LcidType,
  pub configurations: Vec<ConfigurationEntry>,
}

impl SetupConfig {
  /// Distinct non-empty languages, in declaration order.
  pub fn languages(&self) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for entry in &self.configurations {
      let language = entry.language();
      if !language.is_empty() && !languages.iter().any(|l| l == language) {
        languages.push(language.to_string());
      }
    }
    languages
  }
}

/// One configuration unit: installed directly or fetched from elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfigurationEntry {
  Install(Box<InstallConfiguration>),
  Reference(ReferenceConfiguration),
}

impl ConfigurationEntry {
  pub fn filter(&self) -> &PlatformFilter {
    match self {
      ConfigurationEntry::Install(c) => &c.filter,
      ConfigurationEntry::Reference(r) => &r.filter,
    }
  }

  pub fn language(&self) -> &str {
    match self {
      ConfigurationEntry::Install(c) => &c.language,
      ConfigurationEntry::Reference(r) => &r.language,
    }
  }
}

/// A configuration that is downloaded and then loaded in place of this entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfiguration {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub language: String,
  /// Where the referenced configuration file lands.
  pub filename: PathBuf,
  pub download: DownloadDialog,
}

/// The three variants of a command, picked by UI level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSet {
  pub full: String,
  pub basic: String,
  pub silent: String,
}

impl CommandSet {
  pub fn new(full: impl Into<String>) -> Self {
    Self {
      full: full.into(),
      ..Default::default()
    }
  }

  /// The command for `level`. Basic falls back to full, silent falls back to
  /// basic and then full.
  pub fn for_level(&self, level: UiLevel) -> &str {
    match level {
      UiLevel::Full => self.full.as_str(),
      UiLevel::Basic => first_non_empty(&[&self.basic, &self.full]),
      UiLevel::Silent => first_non_empty(&[&self.silent, &self.basic, &self.full]),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.full.is_empty() && self.basic.is_empty() && self.silent.is_empty()
  }
}

fn first_non_empty<'a>(candidates: &[&'a String]) -> &'a str {
  candidates.iter().find(|c| !c.is_empty()).map(|c| c.as_str()).unwrap_or("")
}

/// A set of files fetched before a component runs, or to obtain a reference
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadDialog {
  pub caption: String,
  pub files: Vec<DownloadFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadFile {
  /// `http(s)://` or `file://` URL, or a plain local path.
  pub source_url: String,
  pub destination_path: PathBuf,
  /// Expected lowercase hex SHA-256 of the file.
  pub sha256: Option<String>,
}

/// Global policy for one installable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfiguration {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub language: String,
  /// Language id for this configuration, the detected locale when absent.
  pub language_id: Option<Lcid>,
  pub dialog_caption: String,

  pub supports_install: bool,
  pub supports_uninstall: bool,

  pub auto_start: bool,
  pub auto_close_if_installed: bool,
  pub auto_close_on_error: bool,
  pub reload_on_error: bool,
  pub auto_continue_on_reboot: bool,
  /// Extra arguments for the resumed run.
  pub reboot_cmd: String,

  pub administrator_required: bool,
  pub administrator_required_message: String,

  pub dialog_show_installed: bool,
  pub dialog_show_uninstalled: bool,
  pub dialog_show_required: bool,

  pub status_installed: String,
  pub status_notinstalled: String,

  pub installation_completed: String,
  pub installation_none: String,
  pub uninstallation_completed: String,
  pub uninstallation_none: String,

  pub complete_command: CommandSet,
  pub wait_for_complete_command: bool,
  pub hide_when_complete_command: bool,
  pub disable_wow64_fs_redirection: bool,

  pub must_reboot_required: bool,
  pub reboot_required: String,
  /// Default continue-on-error prompt, `{name}` is the component name.
  pub failed_exec_command_continue: String,

  pub controls: Vec<Control>,
  pub components: Vec<ComponentDef>,
}

impl Default for InstallConfiguration {
  fn default() -> Self {
    Self {
      filter: PlatformFilter::default(),
      language: String::new(),
      language_id: None,
      dialog_caption: String::new(),
      supports_install: yes(),
      supports_uninstall: yes(),
      auto_start: false,
      auto_close_if_installed: yes(),
      auto_close_on_error: false,
      reload_on_error: yes(),
      auto_continue_on_reboot: yes(),
      reboot_cmd: String::new(),
      administrator_required: false,
      administrator_required_message: "This installation requires administrator privileges.".to_string(),
      dialog_show_installed: yes(),
      dialog_show_uninstalled: yes(),
      dialog_show_required: yes(),
      status_installed: "(Installed)".to_string(),
      status_notinstalled: String::new(),
      installation_completed: String::new(),
      installation_none: String::new(),
      uninstallation_completed: String::new(),
      uninstallation_none: String::new(),
      complete_command: CommandSet::default(),
      wait_for_complete_command: yes(),
      hide_when_complete_command: false,
      disable_wow64_fs_redirection: false,
      must_reboot_required: false,
      reboot_required: "A reboot is required to continue. Reboot now?".to_string(),
      failed_exec_command_continue: "Failed to install {name}. Continue with other components?".to_string(),
      controls: Vec::new(),
      components: Vec::new(),
    }
  }
}

impl InstallConfiguration {
  pub fn supports(&self, sequence: Sequence) -> bool {
    match sequence {
      Sequence::Install => self.supports_install,
      Sequence::Uninstall => self.supports_uninstall,
    }
  }

  /// Completion message for `sequence`, the "none" variant when nothing was
  /// installed and one is configured.
  pub fn completion_message(&self, sequence: Sequence, components_installed: bool) -> &str {
    let (completed, none) = match sequence {
      Sequence::Install => (&self.installation_completed, &self.installation_none),
      Sequence::Uninstall => (&self.uninstallation_completed, &self.uninstallation_none),
    };
    if !components_installed && !none.is_empty() {
      none
    } else {
      completed
    }
  }
}
