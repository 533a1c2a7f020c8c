mod cmd;
mod host;
mod output;
mod prompts;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{PlanArgs, RunArgs, cmd_info, cmd_plan, cmd_resume, cmd_run};

/// Installs a set of components described by a JSON configuration
#[derive(Parser)]
#[command(name = "bootstrap")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Write the log to a file instead of stderr
  #[arg(long, global = true, value_name = "FILE")]
  log: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the install or uninstall sequence
  Run(RunArgs),

  /// Show what would be installed without running anything
  Plan(PlanArgs),

  /// Show the detected machine facts
  Info {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show or clear the pending resume after a reboot
  Resume {
    /// Remove the stored command line
    #[arg(long)]
    clear: bool,
  },
}

fn init_logging(verbose: bool, log: Option<&Path>) -> Result<()> {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  match log {
    Some(path) => {
      let file = File::create(path).with_context(|| format!("Failed to create log file: {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
    }
  }
  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose, cli.log.as_deref())?;

  match cli.command {
    Commands::Run(args) => {
      let code = cmd_run(&args)?;
      std::process::exit(code);
    }
    Commands::Plan(args) => cmd_plan(&args),
    Commands::Info { json } => cmd_info(json),
    Commands::Resume { clear } => cmd_resume(clear),
  }
}
