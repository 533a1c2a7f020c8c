//! The install/uninstall orchestration engine.
//!
//! A run moves through these states:
//!
//! ```text
//! Loading -> SelectingLanguage -> EvaluatingComponents -> Running -> Completed
//!                 |                        ^                 |     -> Reboot
//!                 v                        +-----------------+     -> Error
//!             Cancelled                      (reload / next pass)
//! ```
//!
//! Each applicable install configuration is run in turn. The engine is
//! generic over a [`Host`] that supplies user interaction, install checks,
//! process execution and system control.

mod complete;
pub mod evaluate;
pub mod host;
mod load;
mod sequence;
pub mod types;

use tracing::{debug, error, info, warn};

use crate::component::ComponentDef;
use crate::config::{InstallConfiguration, ResolvedControls, resolve_controls};
use crate::consts::{AUTOSTART_FLAG, EXIT_ELEVATED_RESTART};
use crate::platform::{Environment, FsRedirectionGuard};
use crate::session::Session;

pub use evaluate::{Evaluation, evaluate_components, evaluate_with_flip};
pub use host::{CommandRunner, Frontend, Host, InstallCheck, SystemControl};
pub use types::{
  CommandRequest, EngineError, EngineState, ExecuteError, LanguageSelection, MessageKind, Outcome, RunSummary,
  SystemError,
};

/// State of one install configuration while it runs.
struct ConfigRun<'a> {
  config: &'a InstallConfiguration,
  controls: ResolvedControls,
  evaluation: Evaluation,
}

impl ConfigRun<'_> {
  fn component(&self, index: usize) -> &ComponentDef {
    &self.config.components[index]
  }
}

/// A planned configuration: what would run, without running it.
#[derive(Debug, Clone)]
pub struct Plan {
  pub config: InstallConfiguration,
  pub evaluation: Evaluation,
}

pub struct Engine<H: Host> {
  host: H,
  session: Session,
  env: Environment,
  state: EngineState,
}

impl<H: Host> Engine<H> {
  pub fn new(host: H, session: Session, env: Environment) -> Self {
    Self {
      host,
      session,
      env,
      state: EngineState::Loading,
    }
  }

  pub fn state(&self) -> EngineState {
    self.state
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn environment(&self) -> &Environment {
    &self.env
  }

  pub fn host(&self) -> &H {
    &self.host
  }

  pub fn host_mut(&mut self) -> &mut H {
    &mut self.host
  }

  pub fn into_host(self) -> H {
    self.host
  }

  fn set_state(&mut self, state: EngineState) {
    if self.state != state {
      debug!(from = %self.state, to = %state, "engine state");
      self.state = state;
    }
  }

  /// Run every applicable configuration. Fatal errors are shown through the
  /// frontend before they are returned.
  pub fn run(&mut self) -> Result<RunSummary, EngineError> {
    match self.run_configurations() {
      Ok(outcome) => {
        let state = match outcome {
          Outcome::Completed | Outcome::ElevatedRestart => EngineState::Completed,
          Outcome::Failed => EngineState::Error,
          Outcome::Reboot => EngineState::Reboot,
          Outcome::Cancelled => EngineState::Cancelled,
        };
        self.set_state(state);
        let summary = RunSummary {
          outcome,
          exit_code: self.session.recorded_error(),
        };
        info!(outcome = %summary.outcome, exit_code = summary.exit_code, "run finished");
        Ok(summary)
      }
      Err(err) => {
        self.set_state(EngineState::Error);
        error!(error = %err, "run failed");
        self.host.show_message(MessageKind::Error, &err.to_string());
        Err(err)
      }
    }
  }

  /// Load and evaluate every applicable configuration without running
  /// anything.
  pub fn plan(&mut self) -> Result<Vec<Plan>, EngineError> {
    let (setup, base_dir) = self.load_setup()?;
    let configs = self.resolve_configurations(&setup.configurations, None, &base_dir, 0)?;
    if configs.is_empty() {
      return Err(EngineError::NoApplicableConfiguration);
    }

    let mut plans = Vec::new();
    for config in configs {
      self.set_state(EngineState::EvaluatingComponents);
      let evaluation = evaluate_with_flip(&config, self.session.sequence, &self.env, &self.host)?;
      plans.push(Plan { config, evaluation });
    }
    Ok(plans)
  }

  fn run_configurations(&mut self) -> Result<Outcome, EngineError> {
    let (setup, base_dir) = self.load_setup()?;

    self.set_state(EngineState::SelectingLanguage);
    let language = match self.select_language(&setup) {
      LanguageSelection::Cancel => {
        info!("language selection cancelled");
        return Ok(Outcome::Cancelled);
      }
      LanguageSelection::Selected(language) => {
        info!(language = %language, "language selected");
        Some(language)
      }
      LanguageSelection::NotSelected => None,
    };

    let configs = self.resolve_configurations(&setup.configurations, language.as_deref(), &base_dir, 0)?;
    if configs.is_empty() {
      return Err(EngineError::NoApplicableConfiguration);
    }

    let mut outcome = Outcome::Completed;
    for config in &configs {
      outcome = self.run_install_configuration(config)?;
      if outcome != Outcome::Completed {
        break;
      }
    }
    Ok(outcome)
  }

  fn run_install_configuration(&mut self, config: &InstallConfiguration) -> Result<Outcome, EngineError> {
    if !self.host.is_elevation_supported() && config.administrator_required {
      // elevation is impossible here, only an administrator may continue
      if self.host.is_user_admin() {
        info!("user is a member of the administrators");
      } else {
        info!("user is not a member of the administrators");
        return Err(EngineError::Elevation(config.administrator_required_message.clone()));
      }
    }

    if config.administrator_required && self.auto_start(config) {
      if self.restart_elevated(config)? {
        info!("auto-start requires an elevated instance");
        return Ok(Outcome::ElevatedRestart);
      }
      self.clear_resume_marker();
    }

    if !config.administrator_required {
      self.clear_resume_marker();
    }

    self.session.language_id = config.language_id.unwrap_or(self.env.lcid);
    self.session.language = config.language.clone();
    info!(
      language_id = self.session.language_id,
      language = %self.session.language,
      "configuration language"
    );

    if !config.supports_install && !config.supports_uninstall {
      return Err(crate::config::ConfigError::NoSequence.into());
    }
    if !config.supports(self.session.sequence) {
      return Err(crate::config::ConfigError::SequenceNotSupported(self.session.sequence).into());
    }

    let controls = resolve_controls(&config.controls, &self.session.options.control_overrides, &self.env)?;
    self.host.begin_configuration(config);

    self.set_state(EngineState::EvaluatingComponents);
    let evaluation = evaluate_with_flip(config, self.session.sequence, &self.env, &self.host)?;
    self.session.sequence = evaluation.sequence;

    let mut run = ConfigRun {
      config,
      controls,
      evaluation,
    };
    self.start(&mut run)
  }

  fn auto_start(&self, config: &InstallConfiguration) -> bool {
    let options = &self.session.options;
    let sequence = self.session.sequence;
    let mut autostart = false;

    if self.session.is_silent() {
      info!(sequence = %sequence, "silent mode, starting automatically");
      autostart = true;
    }

    if options.resumed_after_reboot {
      if config.auto_continue_on_reboot {
        info!(sequence = %sequence, "resumed after reboot, starting automatically");
        autostart = true;
      }
    } else if options.autostart {
      info!(sequence = %sequence, "auto-start requested, starting automatically");
      autostart = true;
    } else if config.auto_start {
      info!(sequence = %sequence, "configuration defines auto-start, starting automatically");
      autostart = true;
    }

    autostart
  }

  /// Hand the run to an elevated instance when administrator rights are
  /// required and missing. Returns true when the elevated instance started.
  fn restart_elevated(&mut self, config: &InstallConfiguration) -> Result<bool, EngineError> {
    if !config.administrator_required || self.host.is_elevated() {
      return Ok(false);
    }

    let args = self.session.restart_args(AUTOSTART_FLAG);
    info!(args = ?args, "restarting as elevated user");
    match self.host.restart_elevated(&args) {
      Ok(true) => {
        self.session.record_error(EXIT_ELEVATED_RESTART);
        Ok(true)
      }
      Ok(false) => Err(EngineError::Elevation(config.administrator_required_message.clone())),
      Err(err) => {
        error!(error = %err, "elevated restart failed");
        Err(EngineError::Elevation(config.administrator_required_message.clone()))
      }
    }
  }

  fn clear_resume_marker(&mut self) {
    if let Err(err) = self.host.clear_resume_marker() {
      warn!(error = %err, "failed to clear resume marker");
    }
  }

  /// Yes/No question. Silent runs take the default.
  fn ask(&mut self, text: &str, default: bool) -> bool {
    if self.session.is_silent() {
      debug!(text = %text, answer = default, "silent mode, using default answer");
      return default;
    }
    self.host.confirm(text, default)
  }

  fn execute(&mut self, request: &CommandRequest, disable_redirection: bool) -> Result<Option<i32>, ExecuteError> {
    let _guard = if disable_redirection {
      match FsRedirectionGuard::disable() {
        Ok(guard) => Some(guard),
        Err(err) => {
          warn!(error = %err, "failed to disable file system redirection");
          None
        }
      }
    } else {
      None
    };
    self.host.execute(request)
  }
}
