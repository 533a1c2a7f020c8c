//! Locale identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A Windows locale identifier (e.g. 1033 for en-US).
pub type Lcid = u32;

/// Locale used when the operating system locale cannot be determined.
pub const DEFAULT_LCID: Lcid = 1033;

/// Which locale of the machine is used to match locale filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LcidType {
  /// Language of the installed system binaries.
  #[default]
  UserExe,
  System,
  User,
  MuiSystem,
  MuiUser,
}

const LCID_TYPES: &[(LcidType, &str)] = &[
  (LcidType::UserExe, "userexe"),
  (LcidType::System, "system"),
  (LcidType::User, "user"),
  (LcidType::MuiSystem, "muisystem"),
  (LcidType::MuiUser, "muiuser"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid LCID type: {0}")]
pub struct UnknownLcidType(pub String);

impl LcidType {
  pub fn as_str(&self) -> &'static str {
    LCID_TYPES
      .iter()
      .find(|(t, _)| t == self)
      .map(|(_, name)| *name)
      .unwrap_or("userexe")
  }
}

impl fmt::Display for LcidType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for LcidType {
  type Err = UnknownLcidType;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    LCID_TYPES
      .iter()
      .find(|(_, name)| name.eq_ignore_ascii_case(s))
      .map(|(t, _)| *t)
      .ok_or_else(|| UnknownLcidType(s.to_string()))
  }
}

impl TryFrom<String> for LcidType {
  type Error = UnknownLcidType;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<LcidType> for String {
  fn from(t: LcidType) -> Self {
    t.as_str().to_string()
  }
}

/// Detect the machine locale of the given kind.
#[cfg(windows)]
pub fn detect(lcid_type: LcidType) -> Option<Lcid> {
  use windows_sys::Win32::Globalization::{
    GetSystemDefaultLCID, GetSystemDefaultUILanguage, GetUserDefaultLCID, GetUserDefaultUILanguage,
  };

  // SAFETY: these calls have no preconditions.
  let lcid = unsafe {
    match lcid_type {
      LcidType::System => GetSystemDefaultLCID(),
      LcidType::User => GetUserDefaultLCID(),
      LcidType::MuiUser => GetUserDefaultUILanguage() as Lcid,
      // The system UI language is the language of the installed binaries
      LcidType::MuiSystem | LcidType::UserExe => GetSystemDefaultUILanguage() as Lcid,
    }
  };

  (lcid != 0).then_some(lcid)
}

/// Detect the machine locale of the given kind.
#[cfg(not(windows))]
pub fn detect(_lcid_type: LcidType) -> Option<Lcid> {
  None
}
