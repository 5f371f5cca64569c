//! Configuration file discovery.
//!
//! Finds the nearest `.sapi.toml` by walking up the directory tree from a starting point,
//! falling back to the global `~/.sapi.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".sapi.toml";

/// Discovers the configuration file that applies to the given directory.
///
/// Walks up from `cwd` to the filesystem root and returns the first `.sapi.toml` found.
/// When none exists, returns `~/.sapi.toml` if that file exists.
pub fn discover_config_file(cwd: &Path) -> Option<PathBuf> {
    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    global_config_path().filter(|path| path.is_file())
}

/// Returns the path to the global configuration file (`~/.sapi.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}
