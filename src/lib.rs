//! Known folders - resolve platform standard directories to absolute paths.
//!
//! Windows known folder GUIDs, the macOS `~/Library` layout and the XDG Base Directory
//! conventions (including `user-dirs.dirs`) behind a single [`get_path`] call.
//!
//! ```rust,no_run
//! use known_folders::FolderId;
//!
//! # fn main() -> Result<(), known_folders::Error> {
//! match known_folders::get_path(FolderId::Downloads)? {
//!     Some(path) => println!("downloads live in {}", path.display()),
//!     None => println!("no downloads folder here"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod folders;
pub mod os;

pub use error::{Error, Result};
pub use folders::{Config, FolderId, KnownFolders, Platform, get_path, open};
