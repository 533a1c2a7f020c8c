mod info;
mod plan;
mod resume;
mod run;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bootstrap_lib::platform::arch::ProcessorArchitecture;
use bootstrap_lib::platform::lcid::{Lcid, LcidType};
use bootstrap_lib::platform::os::OperatingSystem;
use bootstrap_lib::platform::{Environment, paths};
use clap::Args;

pub use info::cmd_info;
pub use plan::{PlanArgs, cmd_plan};
pub use resume::cmd_resume;
pub use run::{RunArgs, cmd_run};

/// Overrides for the detected machine.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
  /// Operating system release code, e.g. win10
  #[arg(long, value_name = "CODE")]
  pub os: Option<OperatingSystem>,

  /// Processor architecture, e.g. x64
  #[arg(long, value_name = "ARCH")]
  pub arch: Option<ProcessorArchitecture>,

  /// Locale identifier, e.g. 1033
  #[arg(long, value_name = "LCID")]
  pub lcid: Option<Lcid>,

  /// Which locale to detect: userexe, system, user, muisystem, muiuser
  #[arg(long, value_name = "TYPE")]
  pub lcid_type: Option<LcidType>,
}

impl TargetArgs {
  /// The detected machine with overrides applied.
  pub fn environment(&self) -> Environment {
    let mut env = Environment::detect(self.lcid_type.unwrap_or_default());
    if let Some(os) = self.os {
      env = env.with_os(os);
    }
    if let Some(arch) = self.arch {
      env = env.with_arch(arch);
    }
    if let Some(lcid) = self.lcid {
      env = env.with_lcid(lcid);
    }
    env
  }
}

/// Absolute configuration path, so references resolve against its directory.
fn resolve_config(path: Option<&Path>) -> Result<Option<PathBuf>> {
  let Some(path) = path else {
    return Ok(None);
  };
  if !path.exists() {
    // reported by the engine as a missing configuration
    return Ok(Some(path.to_path_buf()));
  }
  let path = dunce::canonicalize(path).with_context(|| format!("Failed to resolve {}", path.display()))?;
  Ok(Some(path))
}

/// Directory relative download destinations resolve against.
fn base_dir(config: Option<&Path>) -> PathBuf {
  config
    .and_then(Path::parent)
    .map(Path::to_path_buf)
    .or_else(paths::exe_dir)
    .unwrap_or_else(|| PathBuf::from("."))
}

/// Parse `id=value`.
pub fn parse_control(s: &str) -> Result<(String, String), String> {
  let (id, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected id=value, got '{}'", s))?;
  if id.is_empty() {
    return Err(format!("empty control id in '{}'", s));
  }
  Ok((id.to_string(), value.to_string()))
}

fn controls(pairs: &[(String, String)]) -> BTreeMap<String, String> {
  pairs.iter().cloned().collect()
}
