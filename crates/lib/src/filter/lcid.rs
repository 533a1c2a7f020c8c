//! Locale filters. Only plain and negated lists are meaningful for locales.

use super::{FilterError, FilterMode, parse_filter};
use crate::platform::lcid::Lcid;

/// Returns true when `lcid` satisfies the locale filter string.
pub fn matches_lcid(lcid: Lcid, filter: &str) -> Result<bool, FilterError> {
  let parse = |token: &str| {
    token.parse::<Lcid>().map_err(|_| FilterError::InvalidLcid {
      token: token.to_string(),
      filter: filter.to_string(),
    })
  };

  let Some(expr) = parse_filter(filter, parse)? else {
    return Ok(true);
  };

  match expr.mode {
    FilterMode::Include => Ok(expr.values.contains(&lcid)),
    FilterMode::Exclude => Ok(!expr.values.contains(&lcid)),
    mode @ (FilterMode::AtLeast | FilterMode::LessThan) => Err(FilterError::UnsupportedMode {
      filter: filter.to_string(),
      mode,
    }),
  }
}
