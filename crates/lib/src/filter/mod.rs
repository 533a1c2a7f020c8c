//! Filter expressions gating configurations, components and controls.
//!
//! A filter is a comma separated token list. The first character of a token
//! selects its mode:
//!
//! | prefix | mode       | meaning                                  |
//! |--------|------------|------------------------------------------|
//! | none   | `Include`  | matches when the value equals any token  |
//! | `!`    | `Exclude`  | matches unless the value equals a token  |
//! | `+`    | `AtLeast`  | family scoped `>=` (releases only)       |
//! | `-`    | `LessThan` | family scoped `<` (releases only)        |
//!
//! One filter string uses exactly one mode. Empty tokens are ignored, so an
//! empty (or all-comma) filter always matches.

pub mod arch;
pub mod lcid;
pub mod os;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::platform::Environment;
use crate::platform::arch::UnknownArchitecture;
use crate::platform::os::{OperatingSystem, UnknownOsCode};

pub use arch::matches_arch;
pub use lcid::matches_lcid;
pub use os::{matches_os, os_in_range};

/// Matching mode of a filter string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
  Include,
  Exclude,
  AtLeast,
  LessThan,
}

impl FilterMode {
  fn of_token(token: &str) -> (Self, &str) {
    match token.as_bytes().first() {
      Some(b'!') => (Self::Exclude, &token[1..]),
      Some(b'+') => (Self::AtLeast, &token[1..]),
      Some(b'-') => (Self::LessThan, &token[1..]),
      _ => (Self::Include, token),
    }
  }
}

impl fmt::Display for FilterMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Include => "include",
      Self::Exclude => "exclude",
      Self::AtLeast => "at-least",
      Self::LessThan => "less-than",
    };
    write!(f, "{}", name)
  }
}

/// Errors in filter expressions. These are configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
  /// Tokens of more than one mode in the same filter.
  #[error("ambiguous filter: {filter}")]
  Ambiguous { filter: String },

  /// A filter string combined with an explicit min/max range.
  #[error("conflicting os_filter={filter}, os_filter_min={min}, os_filter_max={max}")]
  ConflictingRange { filter: String, min: String, max: String },

  /// A mode that has no meaning for the filtered value.
  #[error("{mode} filters are not supported here: {filter}")]
  UnsupportedMode { filter: String, mode: FilterMode },

  #[error("invalid LCID '{token}' in filter: {filter}")]
  InvalidLcid { token: String, filter: String },

  #[error(transparent)]
  UnknownOs(#[from] UnknownOsCode),

  #[error(transparent)]
  UnknownArchitecture(#[from] UnknownArchitecture),
}

/// A parsed single-mode filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr<T> {
  pub mode: FilterMode,
  pub values: Vec<T>,
}

/// Split a filter into non-empty, trimmed tokens.
pub(crate) fn tokens(filter: &str) -> impl Iterator<Item = &str> {
  filter.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Parse a filter string, rejecting mixed modes.
///
/// Returns `Ok(None)` when the filter has no tokens.
pub fn parse_filter<T, E, F>(filter: &str, parse: F) -> Result<Option<FilterExpr<T>>, FilterError>
where
  F: Fn(&str) -> Result<T, E>,
  FilterError: From<E>,
{
  let mut mode = None;
  let mut values = Vec::new();

  for token in tokens(filter) {
    let (token_mode, value) = FilterMode::of_token(token);
    match mode {
      None => mode = Some(token_mode),
      Some(m) if m != token_mode => {
        return Err(FilterError::Ambiguous {
          filter: filter.to_string(),
        });
      }
      Some(_) => {}
    }
    values.push(parse(value.trim())?);
  }

  Ok(mode.map(|mode| FilterExpr { mode, values }))
}

/// Platform conditions shared by configurations, components and controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformFilter {
  /// Release filter string (`"winXP,winVista"`, `"!win2000"`, `"+win7"`).
  pub os_filter: String,
  /// Inclusive lower bound, exclusive with `os_filter`.
  pub os_filter_min: Option<OperatingSystem>,
  /// Inclusive upper bound, exclusive with `os_filter`.
  pub os_filter_max: Option<OperatingSystem>,
  /// Locale filter string (`"1033,1031"`, `"!1041"`).
  pub lcid_filter: String,
  /// Architecture list (`"x64,!x86"`).
  pub processor_architecture_filter: String,
}

impl PlatformFilter {
  pub fn is_empty(&self) -> bool {
    self == &Self::default()
  }

  /// Returns true when every condition holds on `env`.
  pub fn applies(&self, env: &Environment) -> Result<bool, FilterError> {
    let os_ok = match env.os {
      Some(os) => os_in_range(os, &self.os_filter, self.os_filter_min, self.os_filter_max)?,
      None => {
        os::check_range_conflict(&self.os_filter, self.os_filter_min, self.os_filter_max)?;
        let unconstrained = tokens(&self.os_filter).next().is_none()
          && self.os_filter_min.is_none()
          && self.os_filter_max.is_none();
        if !unconstrained {
          debug!(filter = %self.os_filter, "operating system unknown, release filter does not match");
        }
        unconstrained
      }
    };

    let lcid_ok = matches_lcid(env.lcid, &self.lcid_filter)?;

    let arch_ok = match env.arch {
      Some(arch) => matches_arch(arch, &self.processor_architecture_filter)?,
      None => {
        arch::validate(&self.processor_architecture_filter)?;
        tokens(&self.processor_architecture_filter).next().is_none()
      }
    };

    Ok(os_ok && lcid_ok && arch_ok)
  }
}
