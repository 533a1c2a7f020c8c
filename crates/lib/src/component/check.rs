//! Install checks.
//!
//! A component is installed when its checks pass, combined with `all` or
//! `any`. A component without checks is never installed.

use std::path::PathBuf;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::ComponentDef;
use crate::engine::InstallCheck;
use crate::process::shell_command;

/// A single check of the machine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InstallCheckDef {
  /// A file exists.
  File { path: PathBuf },
  /// A directory exists.
  Directory { path: PathBuf },
  /// An environment variable is set, optionally to `value`.
  Env { name: String, value: Option<String> },
  /// A shell command exits with code 0.
  Command { command: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
  #[default]
  All,
  Any,
}

impl InstallCheckDef {
  pub fn passes(&self) -> bool {
    match self {
      InstallCheckDef::File { path } => path.is_file(),
      InstallCheckDef::Directory { path } => path.is_dir(),
      InstallCheckDef::Env { name, value } => match (std::env::var(name), value) {
        (Ok(actual), Some(expected)) => &actual == expected,
        (Ok(_), None) => true,
        (Err(_), _) => false,
      },
      InstallCheckDef::Command { command } => run_check_command(command),
    }
  }
}

fn run_check_command(command: &str) -> bool {
  match shell_command(command)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
  {
    Ok(status) => status.success(),
    Err(e) => {
      debug!(command = %command, error = %e, "install check command failed to start");
      false
    }
  }
}

/// Evaluates a component's declared install checks against the local machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableInstallCheck;

impl InstallCheck for PortableInstallCheck {
  fn is_installed(&self, component: &ComponentDef) -> bool {
    if component.install_checks.is_empty() {
      return false;
    }

    let mut results = component.install_checks.iter().map(|check| {
      let passed = check.passes();
      trace!(component = %component.id, check = ?check, passed, "install check");
      passed
    });

    match component.install_check_mode {
      CheckMode::All => results.all(|passed| passed),
      CheckMode::Any => results.any(|passed| passed),
    }
  }
}
