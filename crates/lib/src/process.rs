//! Running component and completion commands through the platform shell.

use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::consts::EXIT_COMPONENT_FAILED;
use crate::engine::{CommandRequest, CommandRunner, ExecuteError};

/// The shell and the flag that passes it a command line.
#[cfg(unix)]
pub(crate) fn shell() -> (&'static str, &'static str) {
  ("/bin/sh", "-c")
}

#[cfg(windows)]
pub(crate) fn shell() -> (&'static str, &'static str) {
  ("cmd.exe", "/C")
}

pub(crate) fn shell_command(command: &str) -> Command {
  let (shell, flag) = shell();
  let mut cmd = Command::new(shell);
  cmd.arg(flag).arg(command);
  cmd
}

/// Executes command lines with `sh -c` or `cmd /C`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
  fn execute(&mut self, request: &CommandRequest) -> Result<Option<i32>, ExecuteError> {
    if request.command.trim().is_empty() {
      return Err(ExecuteError::EmptyCommand);
    }

    let mut cmd = shell_command(&request.command);
    cmd.stdin(Stdio::null());
    if let Some(dir) = &request.working_directory {
      cmd.current_dir(dir);
    }
    if request.hide_window {
      hide_window(&mut cmd);
    }

    let spawn_error = |source| ExecuteError::Spawn {
      command: request.command.clone(),
      source,
    };

    debug!(command = %request.command, working_dir = ?request.working_directory, "spawning process");
    let mut child = cmd.spawn().map_err(spawn_error)?;

    if !request.wait {
      // never waited on, an exited child stays a zombie until this process ends
      info!(pid = child.id(), "process detached");
      return Ok(None);
    }

    let status = child.wait().map_err(spawn_error)?;
    match status.code() {
      Some(code) => {
        debug!(code, "process exited");
        Ok(Some(code))
      }
      None => {
        warn!(status = %status, "process terminated without an exit code");
        Ok(Some(EXIT_COMPONENT_FAILED))
      }
    }
  }
}

#[cfg(windows)]
fn hide_window(cmd: &mut Command) {
  use std::os::windows::process::CommandExt;
  use windows_sys::Win32::System::Threading::CREATE_NO_WINDOW;

  cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_window(cmd: &mut Command) {
  cmd.stdout(Stdio::null()).stderr(Stdio::null());
}
