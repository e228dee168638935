//! Known folder resolution.
//!
//! ```rust,no_run
//! # use known_folders::folders::{self, FolderId};
//! # fn main() -> Result<(), known_folders::Error> {
//! if let Some(cache) = folders::get_path(FolderId::Cache)? {
//!     println!("caching into {}", cache.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Strategy per [`Platform`]:
//!
//! * Windows: the shell's known folder GUIDs, or `%LOCALAPPDATA%`/`%APPDATA%`.
//! * macOS: fixed subdirectories of `$HOME` (or XDG with [`Config::xdg_on_mac`]).
//! * everything else: XDG Base Directories and `user-dirs.dirs`.

use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, ReadDir};
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::os::env::{Env, Environment};

pub mod spec;
pub mod user_dirs;
mod xdg;

use spec::{Guid, MacSpec, WindowsSpec, mac_spec, windows_spec};
use user_dirs::{Strictness, UserDir};

/// Every folder this crate knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FolderId {
    Home,
    Documents,
    Pictures,
    Music,
    Videos,
    Desktop,
    Downloads,
    Public,
    Fonts,
    AppMenu,
    Cache,
    RoamingConfiguration,
    LocalConfiguration,
    GlobalConfiguration,
    Data,
    Logs,
    Runtime,
    /// Directory of the running executable, never configured.
    ExecutableDir,
}

impl FolderId {
    pub const ALL: [FolderId; 18] = [
        FolderId::Home,
        FolderId::Documents,
        FolderId::Pictures,
        FolderId::Music,
        FolderId::Videos,
        FolderId::Desktop,
        FolderId::Downloads,
        FolderId::Public,
        FolderId::Fonts,
        FolderId::AppMenu,
        FolderId::Cache,
        FolderId::RoamingConfiguration,
        FolderId::LocalConfiguration,
        FolderId::GlobalConfiguration,
        FolderId::Data,
        FolderId::Logs,
        FolderId::Runtime,
        FolderId::ExecutableDir,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FolderId::Home => "home",
            FolderId::Documents => "documents",
            FolderId::Pictures => "pictures",
            FolderId::Music => "music",
            FolderId::Videos => "videos",
            FolderId::Desktop => "desktop",
            FolderId::Downloads => "downloads",
            FolderId::Public => "public",
            FolderId::Fonts => "fonts",
            FolderId::AppMenu => "app_menu",
            FolderId::Cache => "cache",
            FolderId::RoamingConfiguration => "roaming_configuration",
            FolderId::LocalConfiguration => "local_configuration",
            FolderId::GlobalConfiguration => "global_configuration",
            FolderId::Data => "data",
            FolderId::Logs => "logs",
            FolderId::Runtime => "runtime",
            FolderId::ExecutableDir => "executable_dir",
        }
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Switches chosen by the embedding application.
///
/// [`Config::default`] follows the `xdg-force-default` and `xdg-on-mac` cargo features.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Config {
    /// Ignore XDG variables and `user-dirs.dirs`, always use the defaults.
    pub xdg_force_default: bool,
    /// Resolve like XDG on macOS instead of using `~/Library/...`.
    pub xdg_on_mac: bool,
}

impl Config {
    /// Both switches off.
    pub const fn new() -> Self {
        Self {
            xdg_force_default: false,
            xdg_on_mac: false,
        }
    }

    pub const fn xdg_force_default(mut self, value: bool) -> Self {
        self.xdg_force_default = value;
        self
    }

    pub const fn xdg_on_mac(mut self, value: bool) -> Self {
        self.xdg_on_mac = value;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
            .xdg_force_default(cfg!(feature = "xdg-force-default"))
            .xdg_on_mac(cfg!(feature = "xdg-on-mac"))
    }
}

/// Which set of conventions to resolve with.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// freedesktop.org XDG, used by every other Unix-like.
    Xdg,
}

impl Platform {
    /// Platform this crate was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Xdg
        }
    }
}

/// `base`, optionally joined with `suffix`, in a freshly reserved buffer.
pub(crate) fn join_path(base: &OsStr, suffix: Option<&str>) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    path.try_reserve_exact(base.len() + suffix.map_or(0, |suffix| suffix.len() + 1))?;
    path.push(base);
    if let Some(suffix) = suffix {
        path.push(suffix);
    }
    Ok(path)
}

/// Folder resolver bound to an [`Environment`] and a [`Config`].
///
/// ```rust
/// use known_folders::folders::{Config, FolderId, KnownFolders, Platform};
/// use known_folders::os::env::Env;
/// use std::ffi::OsString;
/// use std::path::Path;
///
/// # fn main() -> Result<(), known_folders::Error> {
/// let env = Env::new_from([(OsString::from("HOME"), OsString::from("/Users/jane"))].into());
/// let folders = KnownFolders::for_platform(env, Config::new(), Platform::MacOs);
/// let videos = folders.get_path(FolderId::Videos)?;
/// assert_eq!(videos.as_deref(), Some(Path::new("/Users/jane/Movies")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KnownFolders<E = Env> {
    env: E,
    config: Config,
    platform: Platform,
}

impl KnownFolders<Env> {
    /// Resolver over a snapshot of the process environment, with [`Config::default`].
    pub fn new() -> Self {
        Self::with_env(Env::new(), Config::default())
    }
}

impl Default for KnownFolders<Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> KnownFolders<E> {
    pub fn with_env(env: E, config: Config) -> Self {
        Self::for_platform(env, config, Platform::current())
    }

    /// Resolve with the rules of `platform` instead of the current one.
    ///
    /// GUID lookups only succeed when compiled for Windows, elsewhere they yield `None`.
    pub fn for_platform(env: E, config: Config, platform: Platform) -> Self {
        Self {
            env,
            config,
            platform,
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Absolute path of `folder`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the folder has no value on this platform or configuration, for
    /// example `runtime` without `$XDG_RUNTIME_DIR`, or anything `$HOME`-based without
    /// `$HOME`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`], or [`Error::Io`] when `user-dirs.dirs` exists but can't be read.
    pub fn get_path(&self, folder: FolderId) -> Result<Option<PathBuf>> {
        let path = match (folder, self.platform) {
            (FolderId::ExecutableDir, _) => crate::os::executable_dir(),
            (_, Platform::Windows) => self.windows(folder),
            (_, Platform::MacOs) if self.config.xdg_on_mac => {
                xdg::resolve(&self.env, self.config, folder)
            }
            (_, Platform::MacOs) => self.mac(folder),
            (_, Platform::Xdg) => xdg::resolve(&self.env, self.config, folder),
        }?;
        debug!(%folder, ?path, "resolved known folder");
        Ok(path)
    }

    /// Value of `dir` in the user's `user-dirs.dirs`, ignoring environmental overrides.
    pub fn lookup_user_dir(&self, dir: UserDir) -> Result<Option<PathBuf>> {
        user_dirs::lookup_user_dir(&self.env, dir, Strictness::Lenient)
    }

    /// [`KnownFolders::get_path`] followed by [`fs::read_dir`].
    ///
    /// A folder that doesn't exist on disk is `Ok(None)`, like an unresolved one.
    pub fn open(&self, folder: FolderId) -> Result<Option<ReadDir>> {
        let Some(path) = self.get_path(folder)? else {
            return Ok(None);
        };
        match fs::read_dir(&path) {
            Ok(dir) => Ok(Some(dir)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(%folder, path = %path.display(), "known folder does not exist");
                Ok(None)
            }
            Err(source) => Err(Error::Io { path, source }),
        }
    }

    fn windows(&self, folder: FolderId) -> Result<Option<PathBuf>> {
        match windows_spec(folder) {
            None => Ok(None),
            Some(WindowsSpec::ByGuid(guid)) => known_folder_path(guid),
            Some(WindowsSpec::ByEnvironment { var, subdir }) => match self.env.get(var) {
                Ok(value) if !value.is_empty() => join_path(OsStr::new(value), subdir).map(Some),
                Ok(_) => Ok(None),
                Err(err) => {
                    debug!(%err, %folder, "no value for folder");
                    Ok(None)
                }
            },
        }
    }

    fn mac(&self, folder: FolderId) -> Result<Option<PathBuf>> {
        let suffix = match mac_spec(folder) {
            None => return Ok(None),
            Some(MacSpec::Absolute(path)) => return join_path(OsStr::new(path), None).map(Some),
            Some(MacSpec::Home) => None,
            Some(MacSpec::HomeRelative(suffix)) => Some(suffix),
        };
        match self.env.get_non_empty("HOME") {
            Some(home) => join_path(home, suffix).map(Some),
            None => {
                debug!(%folder, "$HOME is unset");
                Ok(None)
            }
        }
    }
}

#[cfg(windows)]
fn known_folder_path(guid: Guid) -> Result<Option<PathBuf>> {
    crate::os::windows::known_folder_path(guid)
}

#[cfg(not(windows))]
fn known_folder_path(guid: Guid) -> Result<Option<PathBuf>> {
    debug!(?guid, "known folder GUIDs can only be resolved on Windows");
    Ok(None)
}

/// Absolute path of `folder`, using the process environment and [`Config::default`].
///
/// See [`KnownFolders::get_path`].
pub fn get_path(folder: FolderId) -> Result<Option<PathBuf>> {
    KnownFolders::new().get_path(folder)
}

/// Open `folder` for listing, using the process environment and [`Config::default`].
///
/// See [`KnownFolders::open`].
pub fn open(folder: FolderId) -> Result<Option<ReadDir>> {
    KnownFolders::new().open(folder)
}
