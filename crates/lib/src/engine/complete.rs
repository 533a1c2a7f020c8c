use tracing::{debug, info, warn};

use super::{CommandRequest, ConfigRun, Engine, Host, MessageKind};

impl<H: Host> Engine<H> {
  /// Show the completion message and run the completion command for the
  /// active UI level.
  pub(super) fn execute_complete_command(&mut self, run: &ConfigRun<'_>, components_installed: bool) {
    let config = run.config;
    info!(components_installed, "--- complete command");

    let message = config.completion_message(self.session.sequence, components_installed);
    if !message.is_empty() {
      self.host.show_message(MessageKind::Info, message);
    }

    let mut command = config.complete_command.for_level(self.session.ui_level()).to_string();
    if command.is_empty() {
      debug!("no complete command");
      return;
    }

    let extra = &self.session.options.complete_command_args;
    if !extra.is_empty() {
      command.push(' ');
      command.push_str(extra);
    }

    let request = CommandRequest {
      command: run.controls.expand(&command),
      working_directory: None,
      wait: config.wait_for_complete_command,
      hide_window: false,
    };

    if request.wait {
      if config.hide_when_complete_command {
        self.host.hide();
      }
      info!(command = %request.command, "executing complete command");
    } else {
      info!(command = %request.command, "detaching complete command");
    }

    match self.execute(&request, config.disable_wow64_fs_redirection) {
      Ok(Some(code)) => debug!(code, "complete command exited"),
      Ok(None) => debug!("complete command detached"),
      Err(err) => warn!(error = %err, "complete command failed"),
    }
  }
}
