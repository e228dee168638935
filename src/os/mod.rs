//! OS-level access used by folder resolution.
//!
//! [`env`] holds the [`Environment`](env::Environment) capability, which is the only way the
//! resolver looks at environmental variables or files.

use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;

pub mod env;
#[cfg(windows)]
pub(crate) mod windows;

/// Directory containing the currently running executable.
///
/// Platforms without [`std::env::current_exe`] support yield `None`.
pub fn executable_dir() -> Result<Option<PathBuf>> {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(err) => {
            debug!(%err, "cannot locate the running executable");
            return Ok(None);
        }
    };
    let Some(dir) = exe.parent() else {
        return Ok(None);
    };
    let mut buf = PathBuf::new();
    buf.try_reserve_exact(dir.as_os_str().len())?;
    buf.push(dir);
    Ok(Some(buf))
}

/// Transcode a wide (UTF-16) string returned by the OS.
///
/// Unpaired surrogates yield `None`.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn wide_to_path(wide: &[u16]) -> Result<Option<PathBuf>> {
    let mut out = String::new();
    // A single UTF-16 unit never needs more than 3 UTF-8 bytes.
    out.try_reserve_exact(wide.len() * 3)?;
    for decoded in char::decode_utf16(wide.iter().copied()) {
        match decoded {
            Ok(c) => out.push(c),
            Err(err) => {
                debug!(unpaired = err.unpaired_surrogate(), "invalid UTF-16 folder path");
                return Ok(None);
            }
        }
    }
    Ok(Some(PathBuf::from(out)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_ok, assert_some, assert_some_eq};

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn wide_strings_are_transcoded() {
        let path = assert_ok!(wide_to_path(&wide("C:\\Users\\Zoë\\Документы")));
        assert_some_eq!(path, PathBuf::from("C:\\Users\\Zoë\\Документы"));
        assert_some_eq!(assert_ok!(wide_to_path(&[])), PathBuf::new());
    }

    #[test]
    fn unpaired_surrogates_are_absent() {
        let mut units = wide("C:\\Users\\");
        units.push(0xD800);
        assert_none!(assert_ok!(wide_to_path(&units)));
        assert_none!(assert_ok!(wide_to_path(&[0xDC00, b'a' as u16])));
    }

    #[test]
    fn executable_dir_contains_test_binary() {
        let dir = assert_some!(assert_ok!(executable_dir()));
        assert!(dir.is_absolute());
        let exe = std::env::current_exe().unwrap();
        assert_eq!(exe.parent(), Some(dir.as_path()));
    }
}
