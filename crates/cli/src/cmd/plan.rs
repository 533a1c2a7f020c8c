//! Implementation of the `bootstrap plan` command.
//!
//! Loads the configuration, picks the configurations that apply to the
//! machine and shows the evaluated components without running anything.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bootstrap_lib::engine::{Engine, Plan};
use bootstrap_lib::session::{Sequence, Session, SessionOptions};
use clap::Args;
use serde_json::{Value, json};

use super::{TargetArgs, base_dir, resolve_config};
use crate::host::TerminalHost;
use crate::output::{print_components, print_json, print_stat};

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
  /// Configuration file, the bundled configuration.json when omitted
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Plan the uninstall sequence
  #[arg(long)]
  pub uninstall: bool,

  /// Output as JSON
  #[arg(long)]
  pub json: bool,

  #[command(flatten)]
  pub target: TargetArgs,
}

pub fn cmd_plan(args: &PlanArgs) -> Result<()> {
  let config_path = resolve_config(args.config.as_deref())?;
  let env = args.target.environment();
  let host = TerminalHost::new(
    Default::default(),
    base_dir(config_path.as_deref()),
    args.target.lcid,
    PathBuf::from(bootstrap_lib::consts::APP_NAME),
  )
  .non_interactive();

  let options = SessionOptions {
    config_path,
    sequence: if args.uninstall {
      Sequence::Uninstall
    } else {
      Sequence::Install
    },
    lcid_type: args.target.lcid_type,
    ..Default::default()
  };
  let mut engine = Engine::new(host, Session::new(options), env);
  let plans = engine.plan().context("Failed to plan the setup")?;

  if args.json {
    let value = json!({
      "environment": {
        "os": env.os.map(|os| os.code()),
        "arch": env.arch.map(|arch| arch.as_str()),
        "lcid": env.lcid,
      },
      "configurations": plans.iter().map(plan_json).collect::<Vec<_>>(),
    });
    return print_json(&value);
  }

  println!("Environment: {}", env);
  for plan in &plans {
    println!();
    let caption = if plan.config.dialog_caption.is_empty() {
      "(untitled)"
    } else {
      plan.config.dialog_caption.as_str()
    };
    println!("{}", caption);
    if !plan.config.language.is_empty() {
      print_stat("Language", &plan.config.language);
    }
    print_stat("Sequence", plan.evaluation.sequence.as_str());
    print_stat("Selected", &plan.evaluation.checked().count().to_string());
    if plan.evaluation.all_satisfied {
      print_stat("Status", "nothing to do");
    }
    print_components(&plan.evaluation.components);
  }

  Ok(())
}

fn plan_json(plan: &Plan) -> Value {
  let components: Vec<Value> = plan
    .evaluation
    .components
    .iter()
    .map(|c| {
      json!({
        "id": c.id,
        "description": c.description,
        "installed": c.installed,
        "required": c.required,
        "checked": c.checked,
        "disabled": c.disabled,
        "visible": c.visible,
      })
    })
    .collect();

  json!({
    "caption": plan.config.dialog_caption,
    "language": plan.config.language,
    "sequence": plan.evaluation.sequence,
    "all_satisfied": plan.evaluation.all_satisfied,
    "components": components,
  })
}
