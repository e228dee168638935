//! Per-platform tables describing how each [`FolderId`] is found.
//!
//! Every table is an exhaustive `match`, so adding a [`FolderId`] without an entry in each
//! of them does not compile. [`FolderId::ExecutableDir`] has no entry anywhere: it is asked
//! from the OS directly.

use std::fmt;

use super::FolderId;
use super::user_dirs::UserDir;

/// A 128-bit Windows known folder identifier, kept platform independent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(u128);

impl Guid {
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:04X}-{:012X}}}",
            v >> 96,
            (v >> 80) & 0xFFFF,
            (v >> 64) & 0xFFFF,
            (v >> 48) & 0xFFFF,
            v & 0xFFFF_FFFF_FFFF
        )
    }
}

/// How a folder is found on Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowsSpec {
    /// Ask the shell with `SHGetKnownFolderPath`.
    ByGuid(Guid),
    /// Value of `var`, with `subdir` appended when present.
    ByEnvironment {
        var: &'static str,
        subdir: Option<&'static str>,
    },
}

/// How a folder is found on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacSpec {
    /// `$HOME` itself.
    Home,
    /// `$HOME` joined with the suffix.
    HomeRelative(&'static str),
    /// Fixed absolute path, no lookup needed.
    Absolute(&'static str),
}

/// How a folder is found under the XDG conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XdgSpec {
    /// Dedicated environmental variable.
    pub env: &'static str,
    /// Set for user directories, which may also be configured in `user-dirs.dirs`.
    pub user_dir: Option<UserDir>,
    /// Appended to a value found in the environment or `user-dirs.dirs`.
    pub suffix: Option<&'static str>,
    /// Used when nothing was found. A leading `~` stands for `$HOME`.
    pub default: Option<&'static str>,
}

impl XdgSpec {
    const fn var(env: &'static str, default: &'static str) -> Self {
        Self {
            env,
            user_dir: None,
            suffix: None,
            default: Some(default),
        }
    }

    const fn user_dir(dir: UserDir, default: &'static str) -> Self {
        Self {
            env: dir.name(),
            user_dir: Some(dir),
            suffix: None,
            default: Some(default),
        }
    }

    const fn with_suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }
}

pub const FOLDERID_PROFILE: Guid = Guid::from_u128(0x5E6C858F_0E22_4760_9AFE_EA3317B67173);
pub const FOLDERID_DOCUMENTS: Guid = Guid::from_u128(0xFDD39AD0_238F_46AF_ADB4_6C85480369C7);
pub const FOLDERID_PICTURES: Guid = Guid::from_u128(0x33E28130_4E1E_4676_835A_98395C3BC3BB);
pub const FOLDERID_MUSIC: Guid = Guid::from_u128(0x4BD8D571_6D19_48D3_BE97_422220080E43);
pub const FOLDERID_VIDEOS: Guid = Guid::from_u128(0x18989B1D_99B5_455B_841C_AB7C74E4DDFC);
pub const FOLDERID_DESKTOP: Guid = Guid::from_u128(0xB4BFCC3A_DB2C_424C_B029_7FE99A87C641);
pub const FOLDERID_DOWNLOADS: Guid = Guid::from_u128(0x374DE290_123F_4565_9164_39C4925E467B);
pub const FOLDERID_PUBLIC: Guid = Guid::from_u128(0xDFDF76A2_C82A_4D63_906A_5644AC457385);
pub const FOLDERID_FONTS: Guid = Guid::from_u128(0xFD228CB7_AE11_4AE3_864C_16F3910AB8FE);
pub const FOLDERID_START_MENU: Guid = Guid::from_u128(0x625B53C3_AB48_4EC1_BA1F_A1EF4146FC19);
pub const FOLDERID_ROAMING_APP_DATA: Guid =
    Guid::from_u128(0x3EB685DB_65F9_4CF6_A03A_E3EF65729F3D);
pub const FOLDERID_LOCAL_APP_DATA: Guid = Guid::from_u128(0xF1B32785_6FBA_4FCF_9D55_7B8E7F157091);
pub const FOLDERID_PROGRAM_DATA: Guid = Guid::from_u128(0x62AB5D82_FDC1_4DC3_A9DD_070D1D495D97);

/// Windows entry for `folder`, `None` when Windows has no such folder.
pub const fn windows_spec(folder: FolderId) -> Option<WindowsSpec> {
    use WindowsSpec::*;
    Some(match folder {
        FolderId::Home => ByGuid(FOLDERID_PROFILE),
        FolderId::Documents => ByGuid(FOLDERID_DOCUMENTS),
        FolderId::Pictures => ByGuid(FOLDERID_PICTURES),
        FolderId::Music => ByGuid(FOLDERID_MUSIC),
        FolderId::Videos => ByGuid(FOLDERID_VIDEOS),
        FolderId::Desktop => ByGuid(FOLDERID_DESKTOP),
        FolderId::Downloads => ByGuid(FOLDERID_DOWNLOADS),
        FolderId::Public => ByGuid(FOLDERID_PUBLIC),
        FolderId::Fonts => ByGuid(FOLDERID_FONTS),
        FolderId::AppMenu => ByGuid(FOLDERID_START_MENU),
        FolderId::Cache => ByEnvironment {
            var: "LOCALAPPDATA",
            subdir: Some("Temp"),
        },
        FolderId::RoamingConfiguration => ByGuid(FOLDERID_ROAMING_APP_DATA),
        FolderId::LocalConfiguration => ByGuid(FOLDERID_LOCAL_APP_DATA),
        FolderId::GlobalConfiguration => ByGuid(FOLDERID_PROGRAM_DATA),
        FolderId::Data => ByEnvironment {
            var: "APPDATA",
            subdir: None,
        },
        FolderId::Logs => ByEnvironment {
            var: "LOCALAPPDATA",
            subdir: Some("Logs"),
        },
        FolderId::Runtime | FolderId::ExecutableDir => return None,
    })
}

/// macOS entry for `folder`.
pub const fn mac_spec(folder: FolderId) -> Option<MacSpec> {
    use MacSpec::*;
    Some(match folder {
        FolderId::Home => Home,
        FolderId::Documents => HomeRelative("Documents"),
        FolderId::Pictures => HomeRelative("Pictures"),
        FolderId::Music => HomeRelative("Music"),
        FolderId::Videos => HomeRelative("Movies"),
        FolderId::Desktop => HomeRelative("Desktop"),
        FolderId::Downloads => HomeRelative("Downloads"),
        FolderId::Public => HomeRelative("Public"),
        FolderId::Fonts => HomeRelative("Library/Fonts"),
        FolderId::AppMenu => HomeRelative("Applications"),
        FolderId::Cache => HomeRelative("Library/Caches"),
        FolderId::RoamingConfiguration => HomeRelative("Library/Preferences"),
        FolderId::LocalConfiguration => HomeRelative("Library/Application Support"),
        FolderId::GlobalConfiguration => Absolute("/Library/Preferences"),
        FolderId::Data => HomeRelative("Library/Application Support"),
        FolderId::Logs => HomeRelative("Library/Logs"),
        FolderId::Runtime => HomeRelative("Library/Application Support"),
        FolderId::ExecutableDir => return None,
    })
}

/// XDG entry for `folder`.
pub const fn xdg_spec(folder: FolderId) -> Option<XdgSpec> {
    Some(match folder {
        FolderId::Home => XdgSpec {
            env: "HOME",
            user_dir: None,
            suffix: None,
            default: None,
        },
        FolderId::Documents => XdgSpec::user_dir(UserDir::Documents, "~/Documents"),
        FolderId::Pictures => XdgSpec::user_dir(UserDir::Pictures, "~/Pictures"),
        FolderId::Music => XdgSpec::user_dir(UserDir::Music, "~/Music"),
        FolderId::Videos => XdgSpec::user_dir(UserDir::Videos, "~/Videos"),
        FolderId::Desktop => XdgSpec::user_dir(UserDir::Desktop, "~/Desktop"),
        FolderId::Downloads => XdgSpec::user_dir(UserDir::Download, "~/Downloads"),
        FolderId::Public => XdgSpec::user_dir(UserDir::PublicShare, "~/Public"),
        FolderId::Fonts => {
            XdgSpec::var("XDG_DATA_HOME", "~/.local/share/fonts").with_suffix("fonts")
        }
        FolderId::AppMenu => XdgSpec::var("XDG_DATA_HOME", "~/.local/share/applications")
            .with_suffix("applications"),
        FolderId::Cache => XdgSpec::var("XDG_CACHE_HOME", "~/.cache"),
        FolderId::RoamingConfiguration => XdgSpec::var("XDG_CONFIG_HOME", "~/.config"),
        FolderId::LocalConfiguration => XdgSpec::var("XDG_CONFIG_HOME", "~/.config"),
        FolderId::GlobalConfiguration => XdgSpec::var("XDG_CONFIG_DIRS", "/etc"),
        FolderId::Data => XdgSpec::var("XDG_DATA_HOME", "~/.local/share"),
        FolderId::Logs => XdgSpec::var("XDG_STATE_HOME", "~/.local/state"),
        FolderId::Runtime => XdgSpec {
            env: "XDG_RUNTIME_DIR",
            user_dir: None,
            suffix: None,
            default: None,
        },
        FolderId::ExecutableDir => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_some};

    #[test]
    fn executable_dir_is_in_no_table() {
        assert_none!(windows_spec(FolderId::ExecutableDir));
        assert_none!(mac_spec(FolderId::ExecutableDir));
        assert_none!(xdg_spec(FolderId::ExecutableDir));
    }

    #[test]
    fn xdg_defaults_are_home_relative_or_absolute() {
        for folder in FolderId::ALL {
            let Some(spec) = xdg_spec(folder) else { continue };
            if let Some(default) = spec.default {
                assert!(
                    default.starts_with("~/") || default.starts_with('/'),
                    "{folder}: {default}"
                );
            }
        }
    }

    #[test]
    fn user_dirs_use_their_own_variable() {
        for folder in FolderId::ALL {
            let Some(XdgSpec {
                env,
                user_dir: Some(dir),
                ..
            }) = xdg_spec(folder)
            else {
                continue;
            };
            assert_eq!(env, dir.name());
        }
    }

    #[test]
    fn only_global_configuration_is_absolute_on_mac() {
        for folder in FolderId::ALL {
            let spec = mac_spec(folder);
            match folder {
                FolderId::GlobalConfiguration => {
                    assert_eq!(spec, Some(MacSpec::Absolute("/Library/Preferences")));
                }
                FolderId::ExecutableDir => {
                    assert_none!(spec);
                }
                _ => {
                    assert!(!matches!(assert_some!(spec), MacSpec::Absolute(_)));
                }
            }
        }
    }

    #[test]
    fn guid_debug_uses_registry_format() {
        assert_eq!(
            format!("{FOLDERID_PROFILE:?}"),
            "{5E6C858F-0E22-4760-9AFE-EA3317B67173}"
        );
    }
}
