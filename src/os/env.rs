use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;

/// Errors encountered when getting environmental variable.
#[derive(Debug, Clone, Error)]
pub enum EnvStrError {
    /// This variant indicates, that variable `Missing.0` is missing.
    #[error("there is no environmental variable `${0:?}`")]
    Missing(OsString),

    /// This variant indicates, that variable `$NonUTF8.0` is not an UTF-8 string.
    #[error("environmental variable `${0:?}` is not an UTF-8 string")]
    NonUTF8(OsString),
}

/// Everything folder resolution needs from the outside world: environmental variables and
/// the ability to open a file.
///
/// [`Env`] is backed by the real process, [`MockEnv`] by in-memory tables.
pub trait Environment {
    /// Get environmental variable pointed by `key`.
    ///
    /// # Returns
    /// `None` variant indicates missing key, `Some`: existing key.
    fn get_os(&self, key: &str) -> Option<&OsStr>;

    /// Open file `name` inside of directory `dir` for reading.
    fn open_file(&self, dir: &Path, name: &str) -> io::Result<Box<dyn Read + '_>>;

    /// Get environmental variable pointed by `key` and convert it to UTF-8.
    ///
    /// # Examples
    /// ```rust
    /// use known_folders::os::env::{Env, Environment};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let env = Env::new();
    /// let _path = env.get("PATH")?;
    /// # Ok(())
    /// # }
    /// ```
    fn get(&self, key: &str) -> Result<&str, EnvStrError> {
        self.get_os(key)
            .ok_or_else(|| EnvStrError::Missing(key.into()))?
            .to_str()
            .ok_or_else(|| EnvStrError::NonUTF8(key.into()))
    }

    /// Like [`Environment::get_os`], but an empty value counts as missing.
    fn get_non_empty(&self, key: &str) -> Option<&OsStr> {
        self.get_os(key).filter(|value| !value.is_empty())
    }
}

/// Snapshot of [`std::env::vars_os`], which is safe to access on Windows: its
/// environmental variables are case-insensitive.
#[derive(Debug, Clone)]
pub struct Env {
    keys: HashMap<OsString, OsString>,

    normalised_keys: HashMap<OsString, OsString>,
}

impl Env {
    /// Create new default [`Env`].
    pub fn new() -> Self {
        Self::new_from(std::env::vars_os().collect())
    }

    /// Create new [`Env`] using `keys` as existing environmental variables.
    pub fn new_from(env: HashMap<OsString, OsString>) -> Self {
        Self {
            normalised_keys: Env::normalize_map(env.clone()),
            keys: env,
        }
    }

    fn normalize_key(key: impl AsRef<OsStr>) -> OsString {
        key.as_ref().to_ascii_uppercase()
    }

    fn normalize_map(keys: HashMap<OsString, OsString>) -> HashMap<OsString, OsString> {
        keys.into_iter()
            .map(|(key, value)| (Env::normalize_key(key), value))
            .collect()
    }

    /// Reload environmental variables from `env`.
    pub fn reload_from(&mut self, env: HashMap<OsString, OsString>) {
        self.normalised_keys = Env::normalize_map(env.clone());
        self.keys = env;
    }

    /// Reload environmental variables from [`std::env::vars_os`].
    pub fn reload(&mut self) {
        self.reload_from(std::env::vars_os().collect())
    }
}

impl Environment for Env {
    fn get_os(&self, key: &str) -> Option<&OsStr> {
        match self.keys.get(OsStr::new(key)) {
            Some(x) => Some(x),
            None => {
                if cfg!(target_os = "windows") {
                    self.normalised_keys
                        .get(&Env::normalize_key(key))
                        .map(|x| x.as_ref())
                } else {
                    None
                }
            }
        }
    }

    fn open_file(&self, dir: &Path, name: &str) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(dir.join(name))?))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory [`Environment`] for deterministic tests.
///
/// Every variable read must have been declared first, either with [`MockEnv::var`] or
/// [`MockEnv::unset`]. Reading an undeclared variable panics, which makes unintended
/// lookups visible. Outside this crate's own tests it needs the `mock` feature.
///
/// ```rust
/// use known_folders::os::env::{Environment, MockEnv};
///
/// let env = MockEnv::new().var("HOME", "/home/janedoe").unset("XDG_CACHE_HOME");
/// assert_eq!(env.get("HOME").ok(), Some("/home/janedoe"));
/// assert!(env.get_os("XDG_CACHE_HOME").is_none());
/// ```
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, Option<OsString>>,
    files: HashMap<std::path::PathBuf, Vec<u8>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key` as set to `value`.
    pub fn var(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), Some(value.into()));
        self
    }

    /// Declare `key` as unset.
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.vars.insert(key.into(), None);
        self
    }

    /// Register a file at `path` with `contents`.
    pub fn file(
        mut self,
        path: impl Into<std::path::PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

#[cfg(any(test, feature = "mock"))]
impl Environment for MockEnv {
    fn get_os(&self, key: &str) -> Option<&OsStr> {
        match self.vars.get(key) {
            Some(value) => value.as_deref(),
            None => panic!("undeclared environmental variable `${key}` was read"),
        }
    }

    fn open_file(&self, dir: &Path, name: &str) -> io::Result<Box<dyn Read + '_>> {
        match self.files.get(&dir.join(name)) {
            Some(contents) => Ok(Box::new(contents.as_slice())),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_matches, assert_none, assert_ok, assert_some_eq};
    use std::io::Write;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> Env {
        Env::new_from(
            pairs
                .iter()
                .map(|(key, value)| (OsString::from(key), OsString::from(value)))
                .collect(),
        )
    }

    #[test]
    fn get_reads_declared_keys() {
        let env = env_of(&[("HOME", "/home/janedoe")]);
        assert_eq!(assert_ok!(env.get("HOME")), "/home/janedoe");
        assert_matches!(env.get("NOPE"), Err(EnvStrError::Missing(_)));
    }

    #[test]
    fn keys_are_case_insensitive_only_on_windows() {
        let env = env_of(&[("LocalAppData", "C:\\Users\\jane\\AppData\\Local")]);
        if cfg!(windows) {
            assert_some_eq!(env.get_os("LOCALAPPDATA"), OsStr::new("C:\\Users\\jane\\AppData\\Local"));
        } else {
            assert_none!(env.get_os("LOCALAPPDATA"));
        }
    }

    #[test]
    fn empty_values_are_missing_for_get_non_empty() {
        let env = env_of(&[("XDG_DATA_HOME", "")]);
        assert_some_eq!(env.get_os("XDG_DATA_HOME"), OsStr::new(""));
        assert_none!(env.get_non_empty("XDG_DATA_HOME"));
    }

    #[test]
    fn reload_from_replaces_everything() {
        let mut env = env_of(&[("A", "1")]);
        env.reload_from([(OsString::from("B"), OsString::from("2"))].into());
        assert_none!(env.get_os("A"));
        assert_eq!(assert_ok!(env.get("B")), "2");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_values_are_reported() {
        use std::os::unix::ffi::OsStringExt;
        let env = Env::new_from(
            [(OsString::from("HOME"), OsString::from_vec(vec![b'/', 0xff]))].into(),
        );
        assert_matches!(env.get("HOME"), Err(EnvStrError::NonUTF8(_)));
        assert_some_eq!(env.get_os("HOME").map(|home| home.len()), 2);
    }

    #[test]
    fn env_opens_real_files() {
        let tmp = tempdir().expect("needed for tests");
        let mut file = std::fs::File::create(tmp.path().join("user-dirs.dirs")).unwrap();
        file.write_all(b"XDG_MUSIC_DIR=\"/mnt/music\"\n").unwrap();

        let env = env_of(&[]);
        let mut contents = String::new();
        assert_ok!(env.open_file(tmp.path(), "user-dirs.dirs"))
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "XDG_MUSIC_DIR=\"/mnt/music\"\n");

        let missing = env.open_file(tmp.path(), "missing").map(|_| ());
        assert_eq!(assert_err!(missing).kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn mock_env_distinguishes_unset_from_undeclared() {
        let env = MockEnv::new().unset("XDG_RUNTIME_DIR");
        assert_none!(env.get_os("XDG_RUNTIME_DIR"));
        let result = std::panic::catch_unwind(|| env.get_os("HOME").is_some());
        assert_err!(result);
    }

    #[test]
    fn mock_env_serves_registered_files() {
        let env = MockEnv::new().file("/home/jane/.config/user-dirs.dirs", "contents");
        let mut contents = String::new();
        assert_ok!(env.open_file(Path::new("/home/jane/.config"), "user-dirs.dirs"))
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "contents");

        let missing = env.open_file(Path::new("/home/jane"), "user-dirs.dirs").map(|_| ());
        assert_eq!(assert_err!(missing).kind(), io::ErrorKind::NotFound);
    }
}
