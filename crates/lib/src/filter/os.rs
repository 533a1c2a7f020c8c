//! Release filters.
//!
//! At-least and less-than filters compare within a family, and additionally
//! pass any release newer (older) than every listed release, whatever its
//! family. A `+win7` gate is therefore satisfied by Windows 8.

use super::{FilterError, FilterMode, parse_filter, tokens};
use crate::platform::os::OperatingSystem;

/// Returns true when `os` satisfies the release filter string.
pub fn matches_os(os: OperatingSystem, filter: &str) -> Result<bool, FilterError> {
  let Some(expr) = parse_filter(filter, str::parse::<OperatingSystem>)? else {
    return Ok(true);
  };

  let values = &expr.values;
  let matched = match expr.mode {
    FilterMode::Include => values.contains(&os),
    FilterMode::Exclude => !values.contains(&os),
    FilterMode::AtLeast => {
      let in_family = values.iter().any(|v| v.family() == os.family() && os >= *v);
      let newer_than_all = values.iter().max().is_some_and(|max| os >= *max);
      in_family || newer_than_all
    }
    FilterMode::LessThan => {
      let in_family = values.iter().any(|v| v.family() == os.family() && os < *v);
      let older_than_all = values.iter().min().is_some_and(|min| os < *min);
      in_family || older_than_all
    }
  };

  Ok(matched)
}

/// Returns true when `os` satisfies either the filter string or the explicit
/// inclusive range. Supplying both is a configuration error.
pub fn os_in_range(
  os: OperatingSystem,
  filter: &str,
  min: Option<OperatingSystem>,
  max: Option<OperatingSystem>,
) -> Result<bool, FilterError> {
  check_range_conflict(filter, min, max)?;

  if tokens(filter).next().is_some() {
    return matches_os(os, filter);
  }

  Ok(min.is_none_or(|min| os >= min) && max.is_none_or(|max| os <= max))
}

pub(crate) fn check_range_conflict(
  filter: &str,
  min: Option<OperatingSystem>,
  max: Option<OperatingSystem>,
) -> Result<(), FilterError> {
  if !filter.is_empty() && (min.is_some() || max.is_some()) {
    return Err(FilterError::ConflictingRange {
      filter: filter.to_string(),
      min: min.map(|os| os.code().to_string()).unwrap_or_default(),
      max: max.map(|os| os.code().to_string()).unwrap_or_default(),
    });
  }
  Ok(())
}
