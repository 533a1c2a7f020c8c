//! User controls declared by a configuration.
//!
//! Controls are a closed set dispatched on their `type` tag. Check boxes,
//! edits and browse fields carry a value that command-line overrides can
//! replace; the resolved values are available to component commands as
//! `[id]` variables.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ConfigError;
use crate::filter::PlatformFilter;
use crate::platform::Environment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Control {
  Label(LabelControl),
  CheckBox(CheckBoxControl),
  Edit(EditControl),
  Browse(BrowseControl),
  License(LicenseControl),
  Hyperlink(HyperlinkControl),
  Image(ImageControl),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelControl {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckBoxControl {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub id: String,
  pub text: String,
  pub checked: bool,
  pub checked_value: String,
  pub unchecked_value: String,
}

impl Default for CheckBoxControl {
  fn default() -> Self {
    Self {
      filter: PlatformFilter::default(),
      id: String::new(),
      text: String::new(),
      checked: false,
      checked_value: "1".to_string(),
      unchecked_value: "0".to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditControl {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub id: String,
  pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseControl {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub id: String,
  /// Initial path.
  pub text: String,
  pub folders_only: bool,
  /// Chosen path, set when controls are resolved.
  pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseControl {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub text: String,
  pub license_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperlinkControl {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub text: String,
  pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageControl {
  #[serde(flatten)]
  pub filter: PlatformFilter,
  pub path: PathBuf,
}

impl Control {
  pub fn kind(&self) -> &'static str {
    match self {
      Control::Label(_) => "label",
      Control::CheckBox(_) => "checkbox",
      Control::Edit(_) => "edit",
      Control::Browse(_) => "browse",
      Control::License(_) => "license",
      Control::Hyperlink(_) => "hyperlink",
      Control::Image(_) => "image",
    }
  }

  pub fn filter(&self) -> &PlatformFilter {
    match self {
      Control::Label(c) => &c.filter,
      Control::CheckBox(c) => &c.filter,
      Control::Edit(c) => &c.filter,
      Control::Browse(c) => &c.filter,
      Control::License(c) => &c.filter,
      Control::Hyperlink(c) => &c.filter,
      Control::Image(c) => &c.filter,
    }
  }

  /// Id of a control that carries a value.
  pub fn id(&self) -> Option<&str> {
    match self {
      Control::CheckBox(c) => Some(c.id.as_str()),
      Control::Edit(c) => Some(c.id.as_str()),
      Control::Browse(c) => Some(c.id.as_str()),
      _ => None,
    }
    .filter(|id| !id.is_empty())
  }

  /// Current value of a control that carries one.
  pub fn value(&self) -> Option<String> {
    match self {
      Control::CheckBox(c) if c.checked => Some(c.checked_value.clone()),
      Control::CheckBox(c) => Some(c.unchecked_value.clone()),
      Control::Edit(c) => Some(c.text.clone()),
      Control::Browse(c) => Some(c.path.clone()),
      _ => None,
    }
  }

  /// Apply a user-supplied value, or initialise the control when there is none.
  pub fn apply_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
    match (self, value) {
      (Control::CheckBox(c), Some(value)) => {
        if value == c.checked_value {
          c.checked = true;
        } else if value == c.unchecked_value {
          c.checked = false;
        } else {
          return Err(ConfigError::InvalidControlValue {
            id: c.id.clone(),
            value: value.to_string(),
            checked: c.checked_value.clone(),
            unchecked: c.unchecked_value.clone(),
          });
        }
      }
      (Control::Edit(c), Some(value)) => c.text = value.to_string(),
      (Control::Browse(c), Some(value)) => c.path = value.to_string(),
      (Control::Browse(c), None) => c.path = c.text.clone(),
      _ => {}
    }
    Ok(())
  }
}

/// Controls that apply to this machine, with overrides applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedControls {
  pub controls: Vec<Control>,
  /// Control values keyed by id.
  pub values: BTreeMap<String, String>,
}

impl ResolvedControls {
  /// Replace `[id]` references in `command` with control values.
  pub fn expand(&self, command: &str) -> String {
    let mut expanded = command.to_string();
    for (id, value) in &self.values {
      expanded = expanded.replace(&format!("[{}]", id), value);
    }
    expanded
  }
}

/// Filter `controls` for `env` and apply `overrides`.
pub fn resolve_controls(
  controls: &[Control],
  overrides: &BTreeMap<String, String>,
  env: &Environment,
) -> Result<ResolvedControls, ConfigError> {
  let mut resolved = ResolvedControls::default();

  for control in controls {
    if !control.filter().applies(env)? {
      debug!(kind = control.kind(), id = ?control.id(), "skipping control, hidden");
      continue;
    }

    let mut control = control.clone();
    let value = control.id().and_then(|id| overrides.get(id)).map(String::as_str);
    control.apply_override(value)?;

    if let (Some(id), Some(value)) = (control.id(), control.value()) {
      resolved.values.insert(id.to_string(), value);
    }
    debug!(kind = control.kind(), id = ?control.id(), "adding control");
    resolved.controls.push(control);
  }

  for id in overrides.keys() {
    if !resolved.values.contains_key(id) {
      warn!(id = %id, "no visible control for override");
    }
  }

  Ok(resolved)
}
