use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::resume::ResumeError;

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
  Loading,
  SelectingLanguage,
  EvaluatingComponents,
  Running,
  Completed,
  Reboot,
  Cancelled,
  Error,
}

impl fmt::Display for EngineState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      EngineState::Loading => "loading",
      EngineState::SelectingLanguage => "selecting-language",
      EngineState::EvaluatingComponents => "evaluating-components",
      EngineState::Running => "running",
      EngineState::Completed => "completed",
      EngineState::Reboot => "reboot",
      EngineState::Cancelled => "cancelled",
      EngineState::Error => "error",
    };
    write!(f, "{}", name)
  }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// Every configuration ran to its end.
  Completed,
  /// A component failed and the sequence closed.
  Failed,
  /// A reboot is pending.
  Reboot,
  /// The user closed before anything ran.
  Cancelled,
  /// An elevated instance took over.
  ElevatedRestart,
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Outcome::Completed => "completed",
      Outcome::Failed => "failed",
      Outcome::Reboot => "reboot",
      Outcome::Cancelled => "cancelled",
      Outcome::ElevatedRestart => "elevated-restart",
    };
    write!(f, "{}", name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
  pub outcome: Outcome,
  /// The sticky recorded error.
  pub exit_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSelection {
  Selected(String),
  NotSelected,
  Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
  Info,
  Warning,
  Error,
}

/// An external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
  pub command: String,
  pub working_directory: Option<PathBuf>,
  /// Wait for the exit code instead of detaching.
  pub wait: bool,
  pub hide_window: bool,
}

impl CommandRequest {
  pub fn new(command: impl Into<String>) -> Self {
    Self {
      command: command.into(),
      working_directory: None,
      wait: true,
      hide_window: false,
    }
  }
}

#[derive(Debug, Error)]
pub enum ExecuteError {
  #[error("empty command")]
  EmptyCommand,

  #[error("failed to start '{command}': {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Error)]
pub enum SystemError {
  #[error("elevation failed: {0}")]
  Elevation(#[source] io::Error),

  #[error("reboot failed: {0}")]
  Reboot(String),

  #[error(transparent)]
  Resume(#[from] ResumeError),
}

/// Fatal errors that end a run.
#[derive(Debug, Error)]
pub enum EngineError {
  #[error("missing configuration '{}'", .0.display())]
  MissingConfiguration(PathBuf),

  #[error("no configuration given and none bundled")]
  NoConfiguration,

  #[error("no configuration applies to this system")]
  NoApplicableConfiguration,

  #[error("configuration version {version} does not match {expected}")]
  VersionMismatch { version: String, expected: String },

  #[error("error downloading reference configuration '{}'", .0.display())]
  ReferenceDownload(PathBuf),

  #[error("reference configurations nested deeper than {0} levels")]
  ReferenceDepth(usize),

  /// Administrator rights are required and cannot be obtained.
  #[error("{0}")]
  Elevation(String),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  System(#[from] SystemError),
}

impl From<FilterError> for EngineError {
  fn from(err: FilterError) -> Self {
    EngineError::Config(ConfigError::Filter(err))
  }
}
