//! One pass over the checked components and what happens after it.

use tracing::{error, info, warn};

use super::{CommandRequest, ConfigRun, Engine, EngineError, EngineState, Host, MessageKind, Outcome};
use crate::component::{ComponentDef, ExitDisposition};
use crate::consts::{EXIT_COMPONENT_FAILED, EXIT_REBOOT_REQUIRED, RESUME_FLAG};
use crate::engine::evaluate::evaluate_components;
use crate::resume::ResumeMarker;
use crate::session::UiLevel;

impl<H: Host> Engine<H> {
  /// Present the components (or start at once) and run passes until the
  /// configuration is done.
  pub(super) fn start(&mut self, run: &mut ConfigRun<'_>) -> Result<Outcome, EngineError> {
    let config = run.config;
    let sequence = self.session.sequence;
    let all = run.evaluation.all_satisfied;

    let mut autostart = false;
    if sequence.is_install() && all && config.supports_install {
      if config.auto_close_if_installed || self.session.is_silent() {
        info!("all components installed, closing");
        self.execute_complete_command(run, false);
        return Ok(Outcome::Completed);
      }
    } else if !sequence.is_install() && all && config.supports_uninstall {
      info!("no components to uninstall, closing");
      return Ok(Outcome::Completed);
    } else {
      autostart = self.auto_start(config);
    }

    let mut passes = 0;
    loop {
      if !autostart {
        let Some(selected) = self.host.choose_components(self.session.sequence, &run.evaluation.components) else {
          info!(passes, "closed by user");
          return Ok(if passes == 0 {
            Outcome::Cancelled
          } else {
            Outcome::Completed
          });
        };
        for component in run.evaluation.components.iter_mut().filter(|c| !c.disabled) {
          component.checked = selected.contains(&component.id);
        }

        if config.administrator_required
          && self.host.is_elevation_supported()
          && !self.host.is_elevated()
          && self.restart_elevated(config)?
        {
          return Ok(Outcome::ElevatedRestart);
        }
      }
      autostart = false;

      passes += 1;
      let rc = self.run_pass(run)?;
      if let Some(outcome) = self.after_install(run, rc)? {
        return Ok(outcome);
      }
    }
  }

  /// Run the checked components in declaration order. Returns the first
  /// failure code, 0 when nothing failed.
  fn run_pass(&mut self, run: &ConfigRun<'_>) -> Result<i32, EngineError> {
    self.set_state(EngineState::Running);
    let sequence = self.session.sequence;
    let level = self.session.ui_level();
    let mut rc = 0;

    let checked: Vec<usize> = run.evaluation.checked().map(|c| c.index).collect();
    for index in checked {
      let def = run.component(index);
      info!(component = %def.id, name = %def.name(), sequence = %sequence, "--- component");

      let code = match self.run_component(run, def, level) {
        Some(code) => code,
        None => continue,
      };

      let proceed = match code {
        Ok(code) => match def.disposition(code) {
          ExitDisposition::Success => self.component_succeeded(run, def, false),
          ExitDisposition::SuccessRebootRequired => self.component_succeeded(run, def, true),
          ExitDisposition::Failure => {
            let code = code.filter(|c| *c != 0).unwrap_or(EXIT_COMPONENT_FAILED);
            error!(component = %def.id, code, "component failed");
            if rc == 0 {
              rc = code;
            }
            self.component_failed(run, def)
          }
        },
        Err(message) => {
          error!(component = %def.id, error = %message, "component failed");
          if rc == 0 {
            rc = EXIT_COMPONENT_FAILED;
          }
          self.component_failed(run, def)
        }
      };

      if !proceed {
        break;
      }
    }

    Ok(rc)
  }

  /// Download and execute one component. `None` when it has no command for
  /// this level; `Err` when it could not be downloaded or started.
  fn run_component(
    &mut self,
    run: &ConfigRun<'_>,
    def: &ComponentDef,
    level: UiLevel,
  ) -> Option<Result<Option<i32>, String>> {
    if let Some(dialog) = &def.download
      && !self.host.run_download(dialog)
    {
      return Some(Err(format!("error downloading '{}' ({})", def.id, def.name())));
    }

    let command = def.commands(self.session.sequence).for_level(level);
    if command.is_empty() {
      warn!(component = %def.id, level = %level, "no command, skipping");
      return None;
    }

    let request = CommandRequest {
      command: run.controls.expand(command),
      working_directory: def.working_directory.clone(),
      wait: def.wait,
      hide_window: def.hide_window,
    };
    info!(component = %def.id, command = %request.command, wait = request.wait, "executing");

    Some(
      self
        .execute(&request, def.disable_wow64_fs_redirection)
        .map_err(|e| e.to_string()),
    )
  }

  /// Decide whether the sequence continues after a failed component.
  fn component_failed(&mut self, run: &ConfigRun<'_>, def: &ComponentDef) -> bool {
    let message = def.continue_message(&run.config.failed_exec_command_continue);

    let proceed = if message.is_empty() {
      def.default_continue_on_error
    } else if def.allow_continue_on_error {
      self.ask(&message, def.default_continue_on_error)
    } else {
      self.host.show_message(MessageKind::Error, &message);
      false
    };

    if proceed {
      info!(component = %def.id, "failed, continuing");
    } else {
      info!(component = %def.id, "failed, aborting");
    }
    proceed
  }

  /// Show completion messages and handle a reboot request. Returns false when
  /// a reboot stops the pass.
  fn component_succeeded(&mut self, run: &ConfigRun<'_>, def: &ComponentDef, reboot_required: bool) -> bool {
    info!(component = %def.id, "succeeded");
    if !def.install_completed.is_empty() {
      self.host.show_message(MessageKind::Info, &def.install_completed);
    }

    if !reboot_required {
      return true;
    }

    info!(component = %def.id, "requests reboot");
    let text = if def.reboot_required.is_empty() {
      run.config.reboot_required.as_str()
    } else {
      def.reboot_required.as_str()
    };

    if run.config.must_reboot_required || def.must_reboot_required {
      info!(component = %def.id, "requires reboot");
      if !text.is_empty() {
        self.host.show_message(MessageKind::Warning, text);
      }
      self.session.reboot = true;
    } else if self.ask(text, true) {
      self.session.reboot = true;
    }

    if self.session.reboot {
      info!(component = %def.id, "caused a reboot");
      return false;
    }
    true
  }

  /// Decide what follows a pass. `None` continues with another presentation.
  fn after_install(&mut self, run: &mut ConfigRun<'_>, rc: i32) -> Result<Option<Outcome>, EngineError> {
    let config = run.config;
    if rc != 0 {
      self.session.record_error(rc);
    }

    if self.session.reboot {
      self.set_state(EngineState::Reboot);
      self.session.record_error(EXIT_REBOOT_REQUIRED);

      if !self.session.options.no_run_on_reboot {
        let marker = ResumeMarker {
          command_line: self.session.restart_command_line(RESUME_FLAG, &config.reboot_cmd),
        };
        info!(command_line = ?marker.command_line, "writing resume marker");
        if let Err(err) = self.host.write_resume_marker(&marker) {
          warn!(error = %err, "failed to write resume marker");
        }
      }

      if self.session.options.no_reboot {
        info!(code = self.session.recorded_error(), "skipping required reboot, no-reboot was given");
      } else {
        info!(code = self.session.recorded_error(), "rebooting");
        if let Err(err) = self.host.reboot() {
          error!(error = %err, "reboot failed");
        }
      }
      return Ok(Some(Outcome::Reboot));
    }

    if rc != 0 && config.auto_close_on_error {
      info!("failed to install one or more components, closing");
      return Ok(Some(Outcome::Failed));
    }

    if rc != 0 && config.reload_on_error && !self.session.is_silent() {
      info!("failed to install one or more components, reloading");
      self.set_state(EngineState::EvaluatingComponents);
      run.evaluation = evaluate_components(config, self.session.sequence, &self.env, &self.host)?;
      return Ok(None);
    }

    if rc == 0 {
      self.set_state(EngineState::EvaluatingComponents);
      run.evaluation = evaluate_components(config, self.session.sequence, &self.env, &self.host)?;
      if run.evaluation.all_satisfied {
        self.execute_complete_command(run, true);
        if config.auto_close_if_installed {
          return Ok(Some(Outcome::Completed));
        }
      } else {
        info!("not all components report installed, skipping complete command");
      }
    }

    if self.session.is_silent() {
      info!("silent mode, closing");
      return Ok(Some(if rc == 0 { Outcome::Completed } else { Outcome::Failed }));
    }

    Ok(None)
  }
}
