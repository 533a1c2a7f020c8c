//! Processor architecture filters.
//!
//! Unlike release and locale filters, an architecture list may mix plain and
//! negated tokens. Tokens are tried left to right and the first one naming
//! the machine's architecture decides; a list naming nothing that matches
//! does not apply.

use super::{FilterError, FilterMode, tokens};
use crate::platform::arch::ProcessorArchitecture;

fn parse_tokens(filter: &str) -> Result<Vec<(bool, ProcessorArchitecture)>, FilterError> {
  tokens(filter)
    .map(|token| {
      let (negated, name) = match token.strip_prefix('!') {
        Some(rest) => (true, rest.trim()),
        None => (false, token),
      };
      if let Some(mode) = ordering_mode(name) {
        return Err(FilterError::UnsupportedMode {
          filter: filter.to_string(),
          mode,
        });
      }
      Ok((negated, name.parse::<ProcessorArchitecture>()?))
    })
    .collect()
}

fn ordering_mode(name: &str) -> Option<FilterMode> {
  match name.as_bytes().first() {
    Some(b'+') => Some(FilterMode::AtLeast),
    Some(b'-') => Some(FilterMode::LessThan),
    _ => None,
  }
}

/// Check that every token names a known architecture.
pub(crate) fn validate(filter: &str) -> Result<(), FilterError> {
  parse_tokens(filter).map(|_| ())
}

/// Returns true when `arch` satisfies the architecture list.
pub fn matches_arch(arch: ProcessorArchitecture, filter: &str) -> Result<bool, FilterError> {
  let tokens = parse_tokens(filter)?;
  if tokens.is_empty() {
    return Ok(true);
  }

  Ok(
    tokens
      .iter()
      .find(|(_, candidate)| *candidate == arch)
      .is_some_and(|(negated, _)| !negated),
  )
}
