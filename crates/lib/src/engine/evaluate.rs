//! Component evaluation.
//!
//! | sequence  | installed | checked            | disabled                          | hidden when            |
//! |-----------|-----------|--------------------|-----------------------------------|------------------------|
//! | install   | yes       | no                 | yes                               | `!dialog_show_installed`   |
//! | install   | no        | `selected_install` | `required_install`                |                        |
//! | uninstall | no        | no                 | yes                               | `!dialog_show_uninstalled` |
//! | uninstall | yes       | `selected_uninstall` | `required_uninstall`            |                        |
//!
//! Required components are also hidden when `!dialog_show_required`.

use tracing::{debug, info};

use super::host::InstallCheck;
use crate::component::ComponentState;
use crate::config::InstallConfiguration;
use crate::filter::FilterError;
use crate::platform::Environment;
use crate::session::Sequence;

/// Result of evaluating a configuration's components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
  pub sequence: Sequence,
  pub components: Vec<ComponentState>,
  /// Every component already matches the target state of the sequence.
  pub all_satisfied: bool,
}

impl Evaluation {
  pub fn checked(&self) -> impl Iterator<Item = &ComponentState> {
    self.components.iter().filter(|c| c.checked)
  }
}

/// Evaluate the components of `config` that support `sequence` and apply to
/// `env`, in declaration order.
pub fn evaluate_components<C: InstallCheck + ?Sized>(
  config: &InstallConfiguration,
  sequence: Sequence,
  env: &Environment,
  checker: &C,
) -> Result<Evaluation, FilterError> {
  let mut all_satisfied = true;
  let mut components = Vec::new();

  for (index, def) in config.components.iter().enumerate() {
    if !def.supports(sequence) || !def.filter.applies(env)? {
      debug!(component = %def.id, sequence = %sequence, "component does not apply");
      continue;
    }

    let installed = checker.is_installed(def);
    let required = def.is_required(sequence);
    info!(
      component = %def.id,
      name = %def.name(),
      installed,
      "{}",
      if installed { "INSTALLED" } else { "NOT INSTALLED" }
    );

    let (checked, disabled, visible) = match (sequence, installed) {
      (Sequence::Install, true) => (false, true, config.dialog_show_installed),
      (Sequence::Install, false) => (def.selected_install, required, true),
      (Sequence::Uninstall, false) => (false, true, config.dialog_show_uninstalled),
      (Sequence::Uninstall, true) => (def.selected_uninstall, required, true),
    };
    let visible = visible && (config.dialog_show_required || !required);

    all_satisfied &= match sequence {
      Sequence::Install => installed || !def.required_install,
      Sequence::Uninstall => !installed,
    };

    let status = match (installed, &def.status_installed, &def.status_notinstalled) {
      (true, own, _) if !own.is_empty() => own,
      (true, _, _) => &config.status_installed,
      (false, _, own) if !own.is_empty() => own,
      (false, _, _) => &config.status_notinstalled,
    };
    let description = format!("{} {}", def.name(), status).trim_end().to_string();

    components.push(ComponentState {
      index,
      id: def.id.clone(),
      description,
      installed,
      required,
      checked,
      disabled,
      visible,
    });
  }

  Ok(Evaluation {
    sequence,
    components,
    all_satisfied,
  })
}

/// Evaluate for `sequence`, switching to uninstall when an install has
/// nothing left to do, and back again when uninstall has nothing to do either.
pub fn evaluate_with_flip<C: InstallCheck + ?Sized>(
  config: &InstallConfiguration,
  sequence: Sequence,
  env: &Environment,
  checker: &C,
) -> Result<Evaluation, FilterError> {
  let evaluation = evaluate_components(config, sequence, env, checker)?;

  if sequence == Sequence::Install && evaluation.all_satisfied && config.supports_uninstall {
    info!("all components installed, switching to uninstall");
    let uninstall = evaluate_components(config, Sequence::Uninstall, env, checker)?;
    if uninstall.all_satisfied {
      info!("all components uninstalled, nothing to do");
      return evaluate_components(config, Sequence::Install, env, checker);
    }
    return Ok(uninstall);
  }

  Ok(evaluation)
}
