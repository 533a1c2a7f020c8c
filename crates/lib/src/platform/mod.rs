pub mod arch;
pub mod elevation;
pub mod lcid;
pub mod os;
pub mod paths;
pub mod redirect;

use std::fmt;

use arch::ProcessorArchitecture;
use lcid::{DEFAULT_LCID, Lcid, LcidType};
use os::OperatingSystem;

pub use elevation::{is_elevated, is_elevation_supported, is_user_admin};
pub use redirect::FsRedirectionGuard;

/// The machine facts that configuration filters are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
  /// Detected release, `None` when not running on a recognised Windows.
  pub os: Option<OperatingSystem>,
  pub arch: Option<ProcessorArchitecture>,
  pub lcid: Lcid,
}

impl Environment {
  pub fn new(os: Option<OperatingSystem>, arch: Option<ProcessorArchitecture>, lcid: Lcid) -> Self {
    Self { os, arch, lcid }
  }

  /// Detect the current machine at runtime
  pub fn detect(lcid_type: LcidType) -> Self {
    let env = Self {
      os: os::detect(),
      arch: ProcessorArchitecture::current(),
      lcid: lcid::detect(lcid_type).unwrap_or(DEFAULT_LCID),
    };
    tracing::debug!(environment = %env, lcid_type = %lcid_type, "detected environment");
    env
  }

  pub fn with_os(mut self, os: OperatingSystem) -> Self {
    self.os = Some(os);
    self
  }

  pub fn with_arch(mut self, arch: ProcessorArchitecture) -> Self {
    self.arch = Some(arch);
    self
  }

  pub fn with_lcid(mut self, lcid: Lcid) -> Self {
    self.lcid = lcid;
    self
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let os = self.os.map(|os| os.code()).unwrap_or("unknown");
    let arch = self.arch.map(|arch| arch.as_str()).unwrap_or("unknown");
    write!(f, "{}-{} (lcid {})", os, arch, self.lcid)
  }
}
