use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Processor architecture, as named in configuration filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProcessorArchitecture {
  X86,
  Mips,
  Alpha,
  Ppc,
  Shx,
  Arm,
  Ia64,
  Alpha64,
  Msil,
  X64,
  Ia32OnWin64,
  Arm64,
}

const ARCHITECTURES: &[(ProcessorArchitecture, &str, u16)] = &[
  (ProcessorArchitecture::X86, "x86", 0),
  (ProcessorArchitecture::Mips, "mips", 1),
  (ProcessorArchitecture::Alpha, "alpha", 2),
  (ProcessorArchitecture::Ppc, "ppc", 3),
  (ProcessorArchitecture::Shx, "shx", 4),
  (ProcessorArchitecture::Arm, "arm", 5),
  (ProcessorArchitecture::Ia64, "ia64", 6),
  (ProcessorArchitecture::Alpha64, "alpha64", 7),
  (ProcessorArchitecture::Msil, "msil", 8),
  (ProcessorArchitecture::X64, "x64", 9),
  (ProcessorArchitecture::Ia32OnWin64, "ia32_on_win64", 10),
  (ProcessorArchitecture::Arm64, "arm64", 12),
];

/// A processor architecture name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid processor architecture: {0}")]
pub struct UnknownArchitecture(pub String);

impl ProcessorArchitecture {
  /// Detect the native processor architecture
  ///
  /// Returns `None` if the architecture is not supported
  #[cfg(windows)]
  pub fn current() -> Option<Self> {
    use windows_sys::Win32::System::SystemInformation::{GetNativeSystemInfo, SYSTEM_INFO};

    // SAFETY: SYSTEM_INFO is plain data filled in by the call.
    let code = unsafe {
      let mut info: SYSTEM_INFO = std::mem::zeroed();
      GetNativeSystemInfo(&mut info);
      info.Anonymous.Anonymous.wProcessorArchitecture
    };
    Self::from_code(code)
  }

  /// Detect the native processor architecture
  ///
  /// Returns `None` if the architecture is not supported
  #[cfg(not(windows))]
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X64),
      "arm" => Some(Self::Arm),
      "aarch64" => Some(Self::Arm64),
      "mips" => Some(Self::Mips),
      "powerpc" => Some(Self::Ppc),
      _ => None,
    }
  }

  /// Map a `PROCESSOR_ARCHITECTURE_*` value.
  pub fn from_code(code: u16) -> Option<Self> {
    ARCHITECTURES.iter().find(|(_, _, c)| *c == code).map(|(pa, _, _)| *pa)
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    ARCHITECTURES
      .iter()
      .find(|(pa, _, _)| pa == self)
      .map(|(_, name, _)| *name)
      .unwrap_or("unknown")
  }
}

impl fmt::Display for ProcessorArchitecture {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for ProcessorArchitecture {
  type Err = UnknownArchitecture;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ARCHITECTURES
      .iter()
      .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
      .map(|(pa, _, _)| *pa)
      .ok_or_else(|| UnknownArchitecture(s.to_string()))
  }
}

impl TryFrom<String> for ProcessorArchitecture {
  type Error = UnknownArchitecture;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<ProcessorArchitecture> for String {
  fn from(pa: ProcessorArchitecture) -> Self {
    pa.as_str().to_string()
  }
}
