//! Per-run session state.
//!
//! A [`Session`] is created from [`SessionOptions`] at startup and handed to the
//! engine by value. It carries the active sequence, the resolved language, the
//! sticky recorded error and the reboot flag. The recorded error becomes the
//! process exit code.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::APP_NAME;
use crate::platform::lcid::{DEFAULT_LCID, Lcid, LcidType};

/// Whether the run installs or uninstalls components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sequence {
  #[default]
  Install,
  Uninstall,
}

impl Sequence {
  pub fn as_str(&self) -> &'static str {
    match self {
      Sequence::Install => "install",
      Sequence::Uninstall => "uninstall",
    }
  }

  pub fn is_install(&self) -> bool {
    *self == Sequence::Install
  }

  pub fn flipped(self) -> Self {
    match self {
      Sequence::Install => Sequence::Uninstall,
      Sequence::Uninstall => Sequence::Install,
    }
  }
}

impl fmt::Display for Sequence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// How much user interface the run shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLevel {
  #[default]
  Full,
  Basic,
  Silent,
}

impl UiLevel {
  pub fn is_silent(&self) -> bool {
    *self == UiLevel::Silent
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      UiLevel::Full => "full",
      UiLevel::Basic => "basic",
      UiLevel::Silent => "silent",
    }
  }
}

impl fmt::Display for UiLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for UiLevel {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "full" => Ok(UiLevel::Full),
      "basic" => Ok(UiLevel::Basic),
      "silent" => Ok(UiLevel::Silent),
      other => Err(format!("invalid UI level: {}", other)),
    }
  }
}

/// Options collected from the command line for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
  /// Explicit configuration file, takes priority over the bundled one.
  pub config_path: Option<PathBuf>,
  pub sequence: Sequence,
  pub ui_level: UiLevel,
  /// Start the sequence without asking for a component selection.
  pub autostart: bool,
  /// This run was started from a resume marker after a reboot.
  pub resumed_after_reboot: bool,
  /// Leave a pending reboot to the user.
  pub no_reboot: bool,
  /// Do not write a resume marker when a reboot is pending.
  pub no_run_on_reboot: bool,
  /// Appended to the completion command.
  pub complete_command_args: String,
  /// Control values keyed by control id.
  pub control_overrides: BTreeMap<String, String>,
  /// Overrides the configuration's locale detection type.
  pub lcid_type: Option<LcidType>,
  /// Program used to restart this run (elevation, resume after reboot).
  pub program: PathBuf,
  /// Arguments that reproduce this run.
  pub restart_args: Vec<String>,
}

impl Default for SessionOptions {
  fn default() -> Self {
    Self {
      config_path: None,
      sequence: Sequence::Install,
      ui_level: UiLevel::Full,
      autostart: false,
      resumed_after_reboot: false,
      no_reboot: false,
      no_run_on_reboot: false,
      complete_command_args: String::new(),
      control_overrides: BTreeMap::new(),
      lcid_type: None,
      program: PathBuf::from(APP_NAME),
      restart_args: Vec::new(),
    }
  }
}

/// State of a single run.
#[derive(Debug, Clone)]
pub struct Session {
  pub options: SessionOptions,
  /// Active sequence, may flip while components are evaluated.
  pub sequence: Sequence,
  pub language: String,
  pub language_id: Lcid,
  pub lcid_type: LcidType,
  /// A reboot was accepted or is mandatory.
  pub reboot: bool,
  recorded_error: i32,
}

impl Session {
  pub fn new(options: SessionOptions) -> Self {
    Self {
      sequence: options.sequence,
      lcid_type: options.lcid_type.unwrap_or_default(),
      language: String::new(),
      language_id: DEFAULT_LCID,
      reboot: false,
      recorded_error: 0,
      options,
    }
  }

  pub fn ui_level(&self) -> UiLevel {
    self.options.ui_level
  }

  pub fn is_silent(&self) -> bool {
    self.options.ui_level.is_silent()
  }

  /// Record an error code. Only the first non-zero code is kept.
  pub fn record_error(&mut self, code: i32) {
    if self.recorded_error == 0 {
      self.recorded_error = code;
      if code != 0 {
        debug!(code, "recorded error");
      }
    }
  }

  pub fn clear_error(&mut self) {
    self.recorded_error = 0;
  }

  pub fn recorded_error(&self) -> i32 {
    self.recorded_error
  }

  /// Full command line reproducing this run, with `flag` appended once and
  /// `extra` split on whitespace after it.
  pub fn restart_command_line(&self, flag: &str, extra: &str) -> Vec<String> {
    let mut args = self.restart_args(flag);
    args.extend(extra.split_whitespace().map(str::to_string));
    let mut command_line = vec![self.options.program.display().to_string()];
    command_line.extend(args);
    command_line
  }

  /// Arguments reproducing this run with `flag` present exactly once.
  pub fn restart_args(&self, flag: &str) -> Vec<String> {
    let mut args = self.options.restart_args.clone();
    if !args.iter().any(|a| a == flag) {
      args.push(flag.to_string());
    }
    args
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recorded_error_is_sticky() {
    let mut session = Session::new(SessionOptions::default());
    session.record_error(5);
    session.record_error(7);
    session.record_error(0);
    assert_eq!(session.recorded_error(), 5);
  }

  #[test]
  fn zero_does_not_claim_the_slot() {
    let mut session = Session::new(SessionOptions::default());
    session.record_error(0);
    session.record_error(3010);
    assert_eq!(session.recorded_error(), 3010);

    session.clear_error();
    assert_eq!(session.recorded_error(), 0);
  }

  #[test]
  fn restart_arguments_add_flag_once() {
    let session = Session::new(SessionOptions {
      program: PathBuf::from("/opt/bootstrap"),
      restart_args: vec!["run".to_string(), "--autostart".to_string()],
      ..Default::default()
    });

    assert_eq!(session.restart_args("--autostart"), vec!["run", "--autostart"]);
    assert_eq!(
      session.restart_command_line("--reboot", "--quiet"),
      vec!["/opt/bootstrap", "run", "--autostart", "--reboot", "--quiet"]
    );
  }

  #[test]
  fn sequence_flips_both_ways() {
    assert_eq!(Sequence::Install.flipped(), Sequence::Uninstall);
    assert_eq!(Sequence::Uninstall.flipped(), Sequence::Install);
  }

  #[test]
  fn ui_level_parses() {
    assert_eq!("Silent".parse::<UiLevel>().unwrap(), UiLevel::Silent);
    assert!("loud".parse::<UiLevel>().is_err());
  }
}
