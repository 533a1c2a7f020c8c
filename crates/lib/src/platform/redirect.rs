//! WOW64 file system redirection.
//!
//! A 32-bit process on 64-bit Windows sees `SysWOW64` in place of
//! `System32`. Commands that must reach the native system directory run while
//! a [`FsRedirectionGuard`] is alive; dropping the guard restores redirection.
//! Everywhere else the guard is inert.

use std::io;

use tracing::debug;

/// Disables file system redirection for its lifetime.
#[derive(Debug)]
pub struct FsRedirectionGuard {
  #[cfg(all(windows, target_arch = "x86"))]
  old_value: Option<*mut core::ffi::c_void>,
}

impl FsRedirectionGuard {
  #[cfg(all(windows, target_arch = "x86"))]
  pub fn disable() -> io::Result<Self> {
    use windows_sys::Win32::Storage::FileSystem::Wow64DisableWow64FsRedirection;
    use windows_sys::Win32::System::Threading::{GetCurrentProcess, IsWow64Process};

    let mut wow64 = 0;
    // SAFETY: the pseudo handle of the current process is always valid.
    if unsafe { IsWow64Process(GetCurrentProcess(), &mut wow64) } == 0 || wow64 == 0 {
      return Ok(Self { old_value: None });
    }

    let mut old_value = std::ptr::null_mut();
    // SAFETY: old_value receives an opaque token that is handed back on drop.
    if unsafe { Wow64DisableWow64FsRedirection(&mut old_value) } == 0 {
      return Err(io::Error::last_os_error());
    }

    debug!("file system redirection disabled");
    Ok(Self {
      old_value: Some(old_value),
    })
  }

  #[cfg(not(all(windows, target_arch = "x86")))]
  pub fn disable() -> io::Result<Self> {
    debug!("file system redirection not applicable on this platform");
    Ok(Self {})
  }

  /// Returns true when redirection was actually switched off.
  pub fn is_active(&self) -> bool {
    #[cfg(all(windows, target_arch = "x86"))]
    {
      self.old_value.is_some()
    }
    #[cfg(not(all(windows, target_arch = "x86")))]
    {
      false
    }
  }
}

impl Drop for FsRedirectionGuard {
  fn drop(&mut self) {
    #[cfg(all(windows, target_arch = "x86"))]
    if let Some(old_value) = self.old_value.take() {
      use windows_sys::Win32::Storage::FileSystem::Wow64RevertWow64FsRedirection;

      // SAFETY: old_value came from Wow64DisableWow64FsRedirection.
      if unsafe { Wow64RevertWow64FsRedirection(old_value) } == 0 {
        tracing::warn!(error = %io::Error::last_os_error(), "failed to restore file system redirection");
      } else {
        debug!("file system redirection restored");
      }
    }
  }
}
