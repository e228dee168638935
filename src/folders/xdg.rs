//! XDG Base Directory and `user-dirs` resolution.
//!
//! Order for a folder:
//!
//! 1. its dedicated variable, e.g. `$XDG_DATA_HOME`,
//! 2. for user directories, `user-dirs.dirs`,
//! 3. the default from [`xdg_spec`], with `~` expanded to `$HOME`.
//!
//! With [`Config::xdg_force_default`] only step 3 runs (`home` is exempt, it has no default).

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::debug;

use super::spec::{XdgSpec, xdg_spec};
use super::user_dirs::{Strictness, lookup_user_dir};
use super::{Config, FolderId, join_path};
use crate::error::Result;
use crate::os::env::Environment;

pub(crate) fn resolve<E: Environment + ?Sized>(
    env: &E,
    config: Config,
    folder: FolderId,
) -> Result<Option<PathBuf>> {
    let Some(spec) = xdg_spec(folder) else {
        return Ok(None);
    };
    if config.xdg_force_default && folder != FolderId::Home {
        return fallback(env, &spec);
    }
    match configured(env, folder, &spec)? {
        Some(path) => Ok(Some(path)),
        None => fallback(env, &spec),
    }
}

/// Value from the environment or `user-dirs.dirs`, with the suffix applied.
fn configured<E: Environment + ?Sized>(
    env: &E,
    folder: FolderId,
    spec: &XdgSpec,
) -> Result<Option<PathBuf>> {
    if let Some(value) = env.get_non_empty(spec.env) {
        if folder == FolderId::GlobalConfiguration {
            // Search path, only the most important entry is of interest.
            let first = value
                .as_encoded_bytes()
                .split(|&b| b == b':')
                .next()
                .unwrap_or_default();
            if first.is_empty() {
                debug!(variable = spec.env, "first entry is empty, using the default");
                return Ok(None);
            }
            // SAFETY: `first` comes from `value` split on an ASCII byte, which is a valid
            // boundary for encoded bytes.
            let first = unsafe { OsStr::from_encoded_bytes_unchecked(first) };
            return join_path(first, None).map(Some);
        }
        return join_path(value, spec.suffix).map(Some);
    }
    let Some(dir) = spec.user_dir else {
        return Ok(None);
    };
    match lookup_user_dir(env, dir, Strictness::Lenient)? {
        Some(path) => join_path(path.as_os_str(), spec.suffix).map(Some),
        None => Ok(None),
    }
}

fn fallback<E: Environment + ?Sized>(env: &E, spec: &XdgSpec) -> Result<Option<PathBuf>> {
    let Some(default) = spec.default else {
        return Ok(None);
    };
    if !default.starts_with('~') {
        return join_path(OsStr::new(default), None).map(Some);
    }
    let Some(home) = env.get_non_empty("HOME") else {
        debug!(default, "$HOME is unset");
        return Ok(None);
    };
    match home.to_str() {
        Some(home) => {
            let expanded = shellexpand::tilde_with_context(default, || Some(home));
            join_path(OsStr::new(&*expanded), None).map(Some)
        }
        // `shellexpand` works on `str`, join the raw bytes instead.
        None => join_path(home, default.strip_prefix("~/")).map(Some),
    }
}
