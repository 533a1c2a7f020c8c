//! Windows release enumeration and classification.
//!
//! Releases are declared oldest to newest so that the derived [`Ord`] gives the
//! ordering used by range filters. Every release belongs to a family (the
//! release without service pack refinements), see [`OperatingSystem::family`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A Windows release, optionally refined by service pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OperatingSystem {
  Win95,
  Win95Osr2,
  Win98,
  Win98Se,
  WinMe,
  WinNt4,
  WinNt4Sp6,
  WinNt4Sp6a,
  Win2000,
  Win2000Sp1,
  Win2000Sp2,
  Win2000Sp3,
  Win2000Sp4,
  WinXp,
  WinXpSp1,
  WinXpSp2,
  WinXpSp3,
  WinServer2003,
  WinServer2003Sp1,
  WinServer2003Sp2,
  WinServer2003R2,
  WinServer2003R2Sp1,
  WinServer2003R2Sp2,
  WinVista,
  WinVistaSp1,
  WinVistaSp2,
  WinServer2008,
  WinServer2008Sp2,
  WinServer2008R2,
  Win7,
  Win7Sp1,
  Win8,
  Win8Server,
  Win81,
  WinServer2012R2,
  Win10,
  WinServer2016,
  WinServer2019,
  WinServer2022,
  Win11,
  /// Anything newer than the releases known to this build.
  WinMax,
}

/// Release code used in configuration files, with a human readable name.
const RELEASES: &[(OperatingSystem, &str, &str)] = &[
  (OperatingSystem::Win95, "win95", "Windows 95"),
  (OperatingSystem::Win95Osr2, "win95osr2", "Windows 95 OSR2"),
  (OperatingSystem::Win98, "win98", "Windows 98"),
  (OperatingSystem::Win98Se, "win98se", "Windows 98 SE"),
  (OperatingSystem::WinMe, "winME", "Windows Millennium"),
  (OperatingSystem::WinNt4, "winNT4", "Windows NT 4.0"),
  (OperatingSystem::WinNt4Sp6, "winNT4sp6", "Windows NT 4.0 SP6"),
  (OperatingSystem::WinNt4Sp6a, "winNT4sp6a", "Windows NT 4.0 SP6a"),
  (OperatingSystem::Win2000, "win2000", "Windows 2000"),
  (OperatingSystem::Win2000Sp1, "win2000sp1", "Windows 2000 SP1"),
  (OperatingSystem::Win2000Sp2, "win2000sp2", "Windows 2000 SP2"),
  (OperatingSystem::Win2000Sp3, "win2000sp3", "Windows 2000 SP3"),
  (OperatingSystem::Win2000Sp4, "win2000sp4", "Windows 2000 SP4"),
  (OperatingSystem::WinXp, "winXP", "Windows XP"),
  (OperatingSystem::WinXpSp1, "winXPsp1", "Windows XP SP1"),
  (OperatingSystem::WinXpSp2, "winXPsp2", "Windows XP SP2"),
  (OperatingSystem::WinXpSp3, "winXPsp3", "Windows XP SP3"),
  (OperatingSystem::WinServer2003, "winServer2003", "Windows Server 2003"),
  (OperatingSystem::WinServer2003Sp1, "winServer2003sp1", "Windows Server 2003 SP1"),
  (OperatingSystem::WinServer2003Sp2, "winServer2003sp2", "Windows Server 2003 SP2"),
  (OperatingSystem::WinServer2003R2, "winServer2003R2", "Windows Server 2003 R2"),
  (OperatingSystem::WinServer2003R2Sp1, "winServer2003R2sp1", "Windows Server 2003 R2 SP1"),
  (OperatingSystem::WinServer2003R2Sp2, "winServer2003R2sp2", "Windows Server 2003 R2 SP2"),
  (OperatingSystem::WinVista, "winVista", "Windows Vista"),
  (OperatingSystem::WinVistaSp1, "winVistaSp1", "Windows Vista SP1"),
  (OperatingSystem::WinVistaSp2, "winVistaSp2", "Windows Vista SP2"),
  (OperatingSystem::WinServer2008, "winServer2008", "Windows Server 2008"),
  (OperatingSystem::WinServer2008Sp2, "winServer2008sp2", "Windows Server 2008 SP2"),
  (OperatingSystem::WinServer2008R2, "winServer2008R2", "Windows Server 2008 R2"),
  (OperatingSystem::Win7, "win7", "Windows 7"),
  (OperatingSystem::Win7Sp1, "win7sp1", "Windows 7 SP1"),
  (OperatingSystem::Win8, "win8", "Windows 8"),
  (OperatingSystem::Win8Server, "win8Server", "Windows Server 2012"),
  (OperatingSystem::Win81, "win81", "Windows 8.1"),
  (OperatingSystem::WinServer2012R2, "winServer2012R2", "Windows Server 2012 R2"),
  (OperatingSystem::Win10, "win10", "Windows 10"),
  (OperatingSystem::WinServer2016, "winServer2016", "Windows Server 2016"),
  (OperatingSystem::WinServer2019, "winServer2019", "Windows Server 2019"),
  (OperatingSystem::WinServer2022, "winServer2022", "Windows Server 2022"),
  (OperatingSystem::Win11, "win11", "Windows 11"),
  (OperatingSystem::WinMax, "winMax", "Windows (newer)"),
];

/// An operating system code that does not name a known release.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported operating system code: {0}")]
pub struct UnknownOsCode(pub String);

impl OperatingSystem {
  /// All releases, oldest first.
  pub fn all() -> impl Iterator<Item = OperatingSystem> {
    RELEASES.iter().map(|(os, _, _)| *os)
  }

  /// Configuration code of this release (e.g. `winXPsp2`).
  pub fn code(&self) -> &'static str {
    self.entry().1
  }

  /// Human readable release name.
  pub fn name(&self) -> &'static str {
    self.entry().2
  }

  fn entry(&self) -> &'static (OperatingSystem, &'static str, &'static str) {
    // RELEASES is declared in enum order
    &RELEASES[*self as usize]
  }

  /// The family this release belongs to.
  ///
  /// Service pack variants report their base release. Server 2003 R2 is its
  /// own family; Server 2008 R2 belongs to the Server 2008 family.
  pub fn family(&self) -> OperatingSystem {
    use OperatingSystem::*;
    match self {
      Win95 | Win95Osr2 => Win95,
      Win98 | Win98Se => Win98,
      WinMe => WinMe,
      WinNt4 | WinNt4Sp6 | WinNt4Sp6a => WinNt4,
      Win2000 | Win2000Sp1 | Win2000Sp2 | Win2000Sp3 | Win2000Sp4 => Win2000,
      WinXp | WinXpSp1 | WinXpSp2 | WinXpSp3 => WinXp,
      WinServer2003 | WinServer2003Sp1 | WinServer2003Sp2 => WinServer2003,
      WinServer2003R2 | WinServer2003R2Sp1 | WinServer2003R2Sp2 => WinServer2003R2,
      WinVista | WinVistaSp1 | WinVistaSp2 => WinVista,
      WinServer2008 | WinServer2008Sp2 | WinServer2008R2 => WinServer2008,
      Win7 | Win7Sp1 => Win7,
      Win8 => Win8,
      Win8Server => Win8Server,
      Win81 => Win81,
      WinServer2012R2 => WinServer2012R2,
      Win10 => Win10,
      WinServer2016 => WinServer2016,
      WinServer2019 => WinServer2019,
      WinServer2022 => WinServer2022,
      Win11 => Win11,
      WinMax => WinMax,
    }
  }

  /// Returns true for Vista and later, where a process can request elevation.
  pub fn supports_elevation(&self) -> bool {
    *self >= OperatingSystem::WinVista
  }

  /// Classify raw version data into a release.
  ///
  /// Returns `None` for version combinations that do not name any release.
  pub fn classify(info: &OsVersionInfo) -> Option<Self> {
    use OperatingSystem::*;

    let sp = info.service_pack_major;
    let workstation = info.product_type == ProductType::Workstation;

    match info.platform {
      PlatformId::Win32Windows => match (info.major, info.minor) {
        (4, 90) => Some(WinMe),
        (4, 10) if info.csd_marker() == Some('A') => Some(Win98Se),
        (4, 10) => Some(Win98),
        (4, 0) if matches!(info.csd_marker(), Some('B') | Some('C')) => Some(Win95Osr2),
        (4, 0) => Some(Win95),
        _ => None,
      },
      PlatformId::Win32Nt => match (info.major, info.minor) {
        (major, _) if major > 10 => Some(WinMax),
        (10, _) if workstation && info.build >= 22000 => Some(Win11),
        (10, _) if workstation => Some(Win10),
        (10, _) if info.build >= 20348 => Some(WinServer2022),
        (10, _) if info.build >= 17763 => Some(WinServer2019),
        (10, _) => Some(WinServer2016),
        (6, minor) if minor > 3 => Some(WinMax),
        (6, 3) if workstation => Some(Win81),
        (6, 3) => Some(WinServer2012R2),
        (6, 2) if workstation => Some(Win8),
        (6, 2) => Some(Win8Server),
        (6, 1) if workstation && sp >= 1 => Some(Win7Sp1),
        (6, 1) if workstation => Some(Win7),
        (6, 1) => Some(WinServer2008R2),
        (6, 0) if workstation => Some(match sp {
          0 => WinVista,
          1 => WinVistaSp1,
          _ => WinVistaSp2,
        }),
        (6, 0) if sp >= 2 => Some(WinServer2008Sp2),
        (6, 0) => Some(WinServer2008),
        (5, 2) if !workstation && info.server_r2 => Some(match sp {
          0 => WinServer2003R2,
          1 => WinServer2003R2Sp1,
          _ => WinServer2003R2Sp2,
        }),
        (5, 2) if !workstation => Some(match sp {
          0 => WinServer2003,
          1 => WinServer2003Sp1,
          _ => WinServer2003Sp2,
        }),
        // XP x64 reports 5.2 on workstations
        (5, 1) | (5, 2) => Some(match sp {
          0 => WinXp,
          1 => WinXpSp1,
          2 => WinXpSp2,
          _ => WinXpSp3,
        }),
        (5, 0) => Some(match sp {
          0 => Win2000,
          1 => Win2000Sp1,
          2 => Win2000Sp2,
          3 => Win2000Sp3,
          _ => Win2000Sp4,
        }),
        (4, _) if info.csd_version.eq_ignore_ascii_case("Service Pack 6") => {
          Some(if info.nt4_sp6a_hotfix { WinNt4Sp6a } else { WinNt4Sp6 })
        }
        (4, _) => Some(WinNt4),
        _ => None,
      },
    }
  }
}

impl fmt::Display for OperatingSystem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.code())
  }
}

impl FromStr for OperatingSystem {
  type Err = UnknownOsCode;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    RELEASES
      .iter()
      .find(|(_, code, _)| code.eq_ignore_ascii_case(s))
      .map(|(os, _, _)| *os)
      .ok_or_else(|| UnknownOsCode(s.to_string()))
  }
}

impl TryFrom<String> for OperatingSystem {
  type Error = UnknownOsCode;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<OperatingSystem> for String {
  fn from(os: OperatingSystem) -> Self {
    os.code().to_string()
  }
}

/// Platform family reported by the version API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformId {
  /// Windows 95, 98 and Millennium.
  Win32Windows,
  /// The NT line.
  Win32Nt,
}

/// Product type reported by the version API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
  Workstation,
  DomainController,
  Server,
}

/// Raw version data as reported by the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsVersionInfo {
  pub platform: PlatformId,
  pub major: u32,
  pub minor: u32,
  pub build: u32,
  pub service_pack_major: u16,
  pub product_type: ProductType,
  /// Service pack description (e.g. "Service Pack 6").
  pub csd_version: String,
  /// Server 2003 R2 marker (`SM_SERVERR2`).
  pub server_r2: bool,
  /// NT4 hotfix Q246009 is present, distinguishing SP6a from SP6.
  pub nt4_sp6a_hotfix: bool,
}

impl OsVersionInfo {
  /// NT line version data with no service pack.
  pub fn nt(major: u32, minor: u32, build: u32, product_type: ProductType) -> Self {
    Self {
      platform: PlatformId::Win32Nt,
      major,
      minor,
      build,
      service_pack_major: 0,
      product_type,
      csd_version: String::new(),
      server_r2: false,
      nt4_sp6a_hotfix: false,
    }
  }

  /// Set the service pack level.
  pub fn with_service_pack(mut self, sp: u16) -> Self {
    self.service_pack_major = sp;
    self
  }

  /// The 9x line encodes OSR/SE editions in the second CSD character.
  fn csd_marker(&self) -> Option<char> {
    self.csd_version.chars().nth(1)
  }
}

/// Detect the running release.
///
/// Returns `None` when not running on Windows or when the version is not
/// recognised.
#[cfg(windows)]
pub fn detect() -> Option<OperatingSystem> {
  use windows_sys::Win32::System::SystemInformation::{GetVersionExW, OSVERSIONINFOEXW, OSVERSIONINFOW};
  use windows_sys::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_SERVERR2};

  const VER_PLATFORM_WIN32_WINDOWS: u32 = 1;
  const VER_NT_WORKSTATION: u8 = 1;
  const VER_NT_DOMAIN_CONTROLLER: u8 = 2;

  // SAFETY: OSVERSIONINFOEXW is plain data and the size field is set before the call.
  let osvi = unsafe {
    let mut osvi: OSVERSIONINFOEXW = std::mem::zeroed();
    osvi.dwOSVersionInfoSize = std::mem::size_of::<OSVERSIONINFOEXW>() as u32;
    if GetVersionExW(&mut osvi as *mut OSVERSIONINFOEXW as *mut OSVERSIONINFOW) == 0 {
      tracing::warn!("GetVersionExW failed");
      return None;
    }
    osvi
  };

  let csd_len = osvi.szCSDVersion.iter().position(|c| *c == 0).unwrap_or(osvi.szCSDVersion.len());
  let info = OsVersionInfo {
    platform: if osvi.dwPlatformId == VER_PLATFORM_WIN32_WINDOWS {
      PlatformId::Win32Windows
    } else {
      PlatformId::Win32Nt
    },
    major: osvi.dwMajorVersion,
    minor: osvi.dwMinorVersion,
    build: osvi.dwBuildNumber,
    service_pack_major: osvi.wServicePackMajor,
    product_type: match osvi.wProductType {
      VER_NT_WORKSTATION => ProductType::Workstation,
      VER_NT_DOMAIN_CONTROLLER => ProductType::DomainController,
      _ => ProductType::Server,
    },
    csd_version: String::from_utf16_lossy(&osvi.szCSDVersion[..csd_len]),
    // SAFETY: GetSystemMetrics has no preconditions.
    server_r2: unsafe { GetSystemMetrics(SM_SERVERR2) } != 0,
    nt4_sp6a_hotfix: false,
  };

  let os = OperatingSystem::classify(&info);
  if os.is_none() {
    tracing::warn!(info = ?info, "unsupported operating system");
  }
  os
}

/// Detect the running release.
///
/// Returns `None` when not running on Windows or when the version is not
/// recognised.
#[cfg(not(windows))]
pub fn detect() -> Option<OperatingSystem> {
  None
}
