//! Parser for the `user-dirs.dirs` file written by `xdg-user-dirs-update`.
//!
//! The file is a list of shell-style assignments:
//!
//! ```text
//! # This file is written by xdg-user-dirs-update
//! XDG_DESKTOP_DIR="$HOME/Desktop"
//! XDG_DOWNLOAD_DIR="/mnt/storage/Downloads"
//! ```
//!
//! Lines are read into a fixed buffer of [`LINE_CAPACITY`] bytes. Longer lines are truncated
//! to that prefix (and their remainder skipped), same as `xdg-user-dirs` does, so a value
//! cut by the boundary is returned cut. The last valid assignment of a variable wins.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::join_path;
use crate::error::{Error, Result};
use crate::os::env::Environment;

/// Data bytes kept per line, not counting the newline.
pub const LINE_CAPACITY: usize = 511;

/// File name looked up inside of the user configuration directory.
pub const USER_DIRS_FILE: &str = "user-dirs.dirs";

/// Variables that may be assigned in `user-dirs.dirs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserDir {
    Desktop,
    Download,
    Templates,
    PublicShare,
    Documents,
    Music,
    Pictures,
    Videos,
}

impl UserDir {
    pub const ALL: [UserDir; 8] = [
        UserDir::Desktop,
        UserDir::Download,
        UserDir::Templates,
        UserDir::PublicShare,
        UserDir::Documents,
        UserDir::Music,
        UserDir::Pictures,
        UserDir::Videos,
    ];

    /// Variable name, e.g. `XDG_DESKTOP_DIR`.
    pub const fn name(self) -> &'static str {
        match self {
            UserDir::Desktop => "XDG_DESKTOP_DIR",
            UserDir::Download => "XDG_DOWNLOAD_DIR",
            UserDir::Templates => "XDG_TEMPLATES_DIR",
            UserDir::PublicShare => "XDG_PUBLICSHARE_DIR",
            UserDir::Documents => "XDG_DOCUMENTS_DIR",
            UserDir::Music => "XDG_MUSIC_DIR",
            UserDir::Pictures => "XDG_PICTURES_DIR",
            UserDir::Videos => "XDG_VIDEOS_DIR",
        }
    }
}

impl fmt::Display for UserDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do with a line that assigns the requested variable but can't be parsed.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Strictness {
    /// Skip it and keep scanning.
    #[default]
    Lenient,
    /// Fail with [`Error::Parse`].
    Strict,
}

enum Line {
    /// Not an assignment of the requested variable.
    Other,
    Malformed,
    Value(PathBuf),
}

/// Extracts one variable from a `user-dirs.dirs` stream.
#[derive(Debug, Clone, Copy)]
pub struct UserDirsParser<'a> {
    home: Option<&'a OsStr>,
    path: &'a Path,
    strictness: Strictness,
}

impl<'a> UserDirsParser<'a> {
    /// `home` replaces `$HOME` in values, lines needing it are ignored when it is `None`.
    pub fn new(home: Option<&'a OsStr>) -> Self {
        Self {
            home,
            path: Path::new(USER_DIRS_FILE),
            strictness: Strictness::Lenient,
        }
    }

    /// Path reported in [`Error::Io`] when reading fails.
    pub fn path(mut self, path: &'a Path) -> Self {
        self.path = path;
        self
    }

    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Value of the last valid assignment to `dir` in `reader`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use known_folders::folders::user_dirs::{UserDir, UserDirsParser};
    /// # use std::ffi::OsStr;
    /// # use std::path::Path;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let contents = "XDG_MUSIC_DIR=\"$HOME/Music\"\nXDG_MUSIC_DIR=\"$HOME/Tunes\"\n";
    /// let parser = UserDirsParser::new(Some(OsStr::new("/home/jane")));
    /// let music = parser.parse(contents.as_bytes(), UserDir::Music)?;
    /// assert_eq!(music.as_deref(), Some(Path::new("/home/jane/Tunes")));
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(&self, reader: impl Read, dir: UserDir) -> Result<Option<PathBuf>> {
        let mut reader = BufReader::with_capacity(LINE_CAPACITY + 1, reader);
        let mut buf = [0u8; LINE_CAPACITY];
        let mut found = None;
        let mut line_no = 0;
        loop {
            let len = match read_line(&mut reader, &mut buf) {
                Ok(Some(len)) => len,
                Ok(None) => break,
                Err(source) => {
                    return Err(Error::Io {
                        path: self.path.to_path_buf(),
                        source,
                    });
                }
            };
            line_no += 1;
            match self.parse_line(&buf[..len], dir)? {
                Line::Other => {}
                Line::Malformed => {
                    if self.strictness == Strictness::Strict {
                        return Err(Error::Parse { line: line_no });
                    }
                    trace!(line = line_no, variable = dir.name(), "skipping malformed line");
                }
                Line::Value(path) => found = Some(path),
            }
        }
        Ok(found)
    }

    fn parse_line(&self, line: &[u8], dir: UserDir) -> Result<Line> {
        let line = skip_blanks(line);
        let Some(rest) = line.strip_prefix(dir.name().as_bytes()) else {
            return Ok(Line::Other);
        };
        if !matches!(rest.first(), Some(b' ' | b'\t' | b'=')) {
            // Longer name sharing the prefix, e.g. `XDG_MUSIC_DIRS`.
            return Ok(Line::Other);
        }
        let Some(rest) = skip_blanks(rest).strip_prefix(b"=") else {
            return Ok(Line::Malformed);
        };
        let Some(rest) = skip_blanks(rest).strip_prefix(b"\"") else {
            return Ok(Line::Malformed);
        };
        let (relative, rest) = match rest.strip_prefix(b"$HOME/") {
            Some(rest) => (true, rest),
            None if rest.first() == Some(&b'/') => (false, rest),
            None => return Ok(Line::Malformed),
        };

        let value = unquote(rest)?;
        let Some(value) = bytes_to_os_string(value) else {
            return Ok(Line::Malformed);
        };
        if !relative {
            return Ok(Line::Value(value.into()));
        }
        let Some(home) = self.home else {
            trace!(variable = dir.name(), "$HOME is unset, ignoring relative value");
            return Ok(Line::Other);
        };
        let mut path = OsString::new();
        path.try_reserve_exact(home.len() + 1 + value.len())?;
        path.push(home);
        path.push("/");
        path.push(value);
        Ok(Line::Value(path.into()))
    }
}

fn skip_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t'))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Decode a value up to its closing quote, which may be missing on a truncated line.
///
/// `\X` stands for `X`, a backslash ending the line stands for itself.
fn unquote(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut value = Vec::new();
    value.try_reserve_exact(bytes.len())?;
    let mut iter = bytes.iter().copied();
    while let Some(b) = iter.next() {
        match b {
            b'"' | 0 => break,
            b'\\' => match iter.next() {
                Some(0) | None => {
                    value.push(b'\\');
                    break;
                }
                Some(escaped) => value.push(escaped),
            },
            _ => value.push(b),
        }
    }
    Ok(value)
}

#[cfg(unix)]
fn bytes_to_os_string(bytes: Vec<u8>) -> Option<OsString> {
    use std::os::unix::ffi::OsStringExt;
    Some(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn bytes_to_os_string(bytes: Vec<u8>) -> Option<OsString> {
    String::from_utf8(bytes).ok().map(OsString::from)
}

/// Read one line into `buf`, keeping its first `buf.len()` bytes and dropping the rest.
///
/// Returns the kept length, or `None` at end of input. A last line without `\n` still counts.
fn read_line(
    reader: &mut impl BufRead,
    buf: &mut [u8; LINE_CAPACITY],
) -> io::Result<Option<usize>> {
    let mut len = 0;
    let mut read_any = false;
    loop {
        let (consumed, done) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok(read_any.then_some(len));
            }
            read_any = true;
            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = &available[..newline.unwrap_or(available.len())];
            let kept = chunk.len().min(LINE_CAPACITY - len);
            buf[len..len + kept].copy_from_slice(&chunk[..kept]);
            len += kept;
            match newline {
                Some(at) => (at + 1, true),
                None => (chunk.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(Some(len));
        }
    }
}

/// Directory holding `user-dirs.dirs`: `$XDG_CONFIG_HOME`, or `$HOME/.config`.
fn user_config_dir<E: Environment + ?Sized>(env: &E) -> Result<Option<PathBuf>> {
    let (base, suffix) = match env.get_non_empty("XDG_CONFIG_HOME") {
        Some(config) => (config, None),
        None => match env.get_non_empty("HOME") {
            Some(home) => (home, Some(".config")),
            None => return Ok(None),
        },
    };
    join_path(base, suffix).map(Some)
}

/// Look `dir` up in the user's `user-dirs.dirs`.
///
/// A missing file, or one without a valid assignment, yields `None`.
pub fn lookup_user_dir<E: Environment + ?Sized>(
    env: &E,
    dir: UserDir,
    strictness: Strictness,
) -> Result<Option<PathBuf>> {
    let Some(config_dir) = user_config_dir(env)? else {
        debug!(variable = dir.name(), "neither $XDG_CONFIG_HOME nor $HOME is set");
        return Ok(None);
    };
    let path = config_dir.join(USER_DIRS_FILE);
    let file = match env.open_file(&config_dir, USER_DIRS_FILE) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no user-dirs file");
            return Ok(None);
        }
        Err(source) => return Err(Error::Io { path, source }),
    };
    UserDirsParser::new(env.get_non_empty("HOME"))
        .path(&path)
        .strictness(strictness)
        .parse(file, dir)
}
