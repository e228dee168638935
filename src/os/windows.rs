//! Known folder lookup through the shell's GUID registry.

use std::ffi::c_void;
use std::path::PathBuf;
use std::ptr;

use tracing::debug;
use windows_sys::Win32::Foundation::{E_OUTOFMEMORY, S_OK};
use windows_sys::Win32::System::Com::CoTaskMemFree;
use windows_sys::Win32::UI::Shell::{KF_FLAG_DEFAULT, SHGetKnownFolderPath};
use windows_sys::core::{GUID, PWSTR};

use crate::error::{Error, Result};
use crate::folders::spec::Guid;
use crate::os::wide_to_path;

/// RAII guard, which calls [`CoTaskMemFree`] on drop.
struct CoTaskMem(PWSTR);

impl Drop for CoTaskMem {
    fn drop(&mut self) {
        // SAFETY: `self.0` is either null or was allocated by the shell with `CoTaskMemAlloc`,
        // both of which `CoTaskMemFree` accepts.
        unsafe { CoTaskMemFree(self.0 as *const c_void) }
    }
}

/// Ask the shell for the folder registered under `guid`.
pub(crate) fn known_folder_path(guid: Guid) -> Result<Option<PathBuf>> {
    let id = GUID::from_u128(guid.as_u128());
    let mut raw: PWSTR = ptr::null_mut();
    // SAFETY: `id` and `raw` outlive the call, a null token means "current user".
    let hr = unsafe { SHGetKnownFolderPath(&id, KF_FLAG_DEFAULT as _, ptr::null_mut(), &mut raw) };
    // Freed on every path, the shell may allocate even on failure.
    let buffer = CoTaskMem(raw);
    if hr == E_OUTOFMEMORY {
        return Err(Error::OutOfMemory);
    }
    if hr != S_OK || buffer.0.is_null() {
        debug!(hr, ?guid, "SHGetKnownFolderPath failed");
        return Ok(None);
    }
    // SAFETY: on success the shell returns a NUL-terminated wide string.
    let wide = unsafe {
        let mut len = 0;
        while *buffer.0.add(len) != 0 {
            len += 1;
        }
        std::slice::from_raw_parts(buffer.0, len)
    };
    wide_to_path(wide)
}
