//! Administrator rights and process elevation.
//!
//! - **Windows**: Vista and later support UAC elevation; earlier releases
//!   require the user to be a member of the Administrators group.
//! - **Unix**: elevation goes through `sudo`, the effective uid decides.

use std::io;
use std::path::Path;

use tracing::{debug, info};

/// Returns true when the platform can elevate a running user on demand.
#[cfg(windows)]
pub fn is_elevation_supported() -> bool {
  super::os::detect().map(|os| os.supports_elevation()).unwrap_or(true)
}

#[cfg(not(windows))]
pub fn is_elevation_supported() -> bool {
  true
}

/// Returns true when the current user belongs to the administrators.
#[cfg(windows)]
pub fn is_user_admin() -> bool {
  use windows_sys::Win32::UI::Shell::IsUserAnAdmin;

  // SAFETY: IsUserAnAdmin has no preconditions.
  unsafe { IsUserAnAdmin() != 0 }
}

#[cfg(not(windows))]
pub fn is_user_admin() -> bool {
  is_elevated()
}

/// Returns true when the current process runs with elevated rights.
#[cfg(windows)]
pub fn is_elevated() -> bool {
  use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
  use windows_sys::Win32::Security::{GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation};
  use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

  // SAFETY: the token handle is closed before returning and the output
  // buffer is sized for TOKEN_ELEVATION.
  unsafe {
    let mut token: HANDLE = std::ptr::null_mut();
    if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
      return false;
    }

    let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
    let mut returned = 0u32;
    let ok = GetTokenInformation(
      token,
      TokenElevation,
      &mut elevation as *mut TOKEN_ELEVATION as *mut core::ffi::c_void,
      std::mem::size_of::<TOKEN_ELEVATION>() as u32,
      &mut returned,
    );
    CloseHandle(token);

    ok != 0 && elevation.TokenIsElevated != 0
  }
}

#[cfg(unix)]
pub fn is_elevated() -> bool {
  rustix::process::geteuid().is_root()
}

/// Relaunch `program` with elevated rights.
///
/// Returns `Ok(true)` when the elevated instance was started, `Ok(false)` when
/// the user declined the elevation prompt.
#[cfg(windows)]
pub fn restart_elevated(program: &Path, args: &[String]) -> io::Result<bool> {
  use std::os::windows::ffi::OsStrExt;
  use windows_sys::Win32::UI::Shell::ShellExecuteW;
  use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

  const ERROR_CANCELLED: i32 = 1223;

  fn wide(s: &std::ffi::OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
  }

  let parameters = args
    .iter()
    .map(|arg| if arg.contains(' ') { format!("\"{}\"", arg) } else { arg.clone() })
    .collect::<Vec<_>>()
    .join(" ");

  info!(program = %program.display(), parameters = %parameters, "restarting elevated");

  let verb = wide("runas".as_ref());
  let file = wide(program.as_os_str());
  let params = wide(parameters.as_ref());

  // SAFETY: all strings are nul-terminated and outlive the call.
  let result = unsafe {
    ShellExecuteW(
      std::ptr::null_mut(),
      verb.as_ptr(),
      file.as_ptr(),
      params.as_ptr(),
      std::ptr::null(),
      SW_SHOWNORMAL,
    )
  };

  if result as isize > 32 {
    return Ok(true);
  }

  let err = io::Error::last_os_error();
  if err.raw_os_error() == Some(ERROR_CANCELLED) {
    debug!("elevation declined by user");
    return Ok(false);
  }
  Err(err)
}

#[cfg(unix)]
pub fn restart_elevated(program: &Path, args: &[String]) -> io::Result<bool> {
  info!(program = %program.display(), args = ?args, "restarting through sudo");

  // sudo shares the terminal, so wait for the elevated instance to finish
  let status = std::process::Command::new("sudo").arg(program).args(args).status()?;
  debug!(status = ?status.code(), "elevated instance exited");

  // sudo exits with 1 when authentication is refused
  Ok(status.code() != Some(1))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  #[cfg(unix)]
  fn admin_follows_effective_uid() {
    assert_eq!(is_user_admin(), is_elevated());
    assert!(is_elevation_supported());
  }
}
