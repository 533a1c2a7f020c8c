//! Implementation of the `bootstrap run` command.
//!
//! Runs the install (or uninstall) sequence of the applicable configurations
//! and turns the recorded error into the process exit code.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use bootstrap_lib::engine::{Engine, Outcome};
use bootstrap_lib::session::{Sequence, Session, SessionOptions, UiLevel};
use clap::Args;
use tracing::{debug, error};

use super::{TargetArgs, base_dir, controls, parse_control, resolve_config};
use crate::host::TerminalHost;
use crate::output::{format_duration, print_info, print_success, print_warning};

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
  /// Configuration file, the bundled configuration.json when omitted
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Uninstall instead of install
  #[arg(long)]
  pub uninstall: bool,

  /// No user interface, take default answers
  #[arg(short, long, conflicts_with = "basic")]
  pub quiet: bool,

  /// Reduced user interface, picks the basic command variants
  #[arg(long)]
  pub basic: bool,

  /// Start without asking for a component selection
  #[arg(long)]
  pub autostart: bool,

  /// This run continues after a reboot
  #[arg(long)]
  pub reboot: bool,

  /// Never reboot, leave a pending reboot to the user
  #[arg(long)]
  pub no_reboot: bool,

  /// Do not continue the setup after a reboot
  #[arg(long)]
  pub no_run_on_reboot: bool,

  /// Appended to the completion command
  #[arg(long, value_name = "ARGS", allow_hyphen_values = true, default_value = "")]
  pub complete_command_args: String,

  /// Control value, repeatable
  #[arg(long = "control", value_name = "ID=VALUE", value_parser = parse_control)]
  pub controls: Vec<(String, String)>,

  #[command(flatten)]
  pub target: TargetArgs,
}

impl RunArgs {
  pub fn ui_level(&self) -> UiLevel {
    if self.quiet {
      UiLevel::Silent
    } else if self.basic {
      UiLevel::Basic
    } else {
      UiLevel::Full
    }
  }

  fn session_options(
    &self,
    config_path: Option<PathBuf>,
    program: PathBuf,
    restart_args: Vec<String>,
  ) -> SessionOptions {
    SessionOptions {
      config_path,
      sequence: if self.uninstall {
        Sequence::Uninstall
      } else {
        Sequence::Install
      },
      ui_level: self.ui_level(),
      autostart: self.autostart,
      resumed_after_reboot: self.reboot,
      no_reboot: self.no_reboot,
      no_run_on_reboot: self.no_run_on_reboot,
      complete_command_args: self.complete_command_args.clone(),
      control_overrides: controls(&self.controls),
      lcid_type: self.target.lcid_type,
      program,
      restart_args,
    }
  }
}

/// Arguments that repeat this run, with the `--config` value replaced by the
/// resolved path.
fn restart_args(args: impl IntoIterator<Item = String>, config: Option<&Path>) -> Vec<String> {
  let mut args = args.into_iter();
  let Some(config) = config.map(|p| p.display().to_string()) else {
    return args.collect();
  };

  let mut out = Vec::new();
  while let Some(arg) = args.next() {
    if arg == "--complete-command-args" || arg == "--control" {
      // values are taken verbatim and may start with a hyphen
      out.push(arg);
      out.extend(args.next());
    } else if arg == "-c" || arg == "--config" {
      out.push(arg);
      if args.next().is_some() {
        out.push(config.clone());
      }
    } else if arg.starts_with("--config=") {
      out.push(format!("--config={}", config));
    } else if arg.starts_with("-c") {
      out.push(format!("-c{}", config));
    } else {
      out.push(arg);
    }
  }
  out
}

/// Run the sequence. Returns the process exit code.
pub fn cmd_run(args: &RunArgs) -> Result<i32> {
  let started = Instant::now();
  let config_path = resolve_config(args.config.as_deref())?;
  let program = std::env::current_exe().unwrap_or_else(|_| PathBuf::from(bootstrap_lib::consts::APP_NAME));
  let restart_args = restart_args(std::env::args().skip(1), config_path.as_deref());
  debug!(program = %program.display(), args = ?restart_args, "restart command");

  let ui_level = args.ui_level();
  let host = TerminalHost::new(ui_level, base_dir(config_path.as_deref()), args.target.lcid, program.clone());
  let session = Session::new(args.session_options(config_path, program, restart_args));
  let mut engine = Engine::new(host, session, args.target.environment());

  let summary = match engine.run() {
    Ok(summary) => summary,
    Err(err) => {
      // already shown by the host
      error!(error = %err, "setup failed");
      return Ok(1);
    }
  };

  if !ui_level.is_silent() {
    let elapsed = format_duration(started.elapsed());
    match summary.outcome {
      Outcome::Completed if summary.exit_code == 0 => print_success(&format!("Setup finished in {}", elapsed)),
      Outcome::Completed | Outcome::Failed => {
        print_warning(&format!("Setup finished with error {} in {}", summary.exit_code, elapsed))
      }
      Outcome::Reboot => print_warning("A reboot is required to finish the setup."),
      Outcome::Cancelled => print_info("Setup cancelled."),
      Outcome::ElevatedRestart => print_info("Setup continues in an elevated instance."),
    }
  }

  Ok(summary.exit_code)
}
