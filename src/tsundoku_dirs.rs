//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | Linux | macOS |
//! |---------|-------|-------|
//! | Data | `~/.local/share/tsundoku/` | `~/Library/Application Support/tsundoku/` |
//! | Config | `~/.config/tsundoku/` | `~/Library/Application Support/tsundoku/` |
//!
//! `TSUNDOKU_DATA_DIR` and `TSUNDOKU_CONFIG_DIR` override the defaults.
//! `XDG_CONFIG_HOME` is honoured on every platform for the config directory.

use std::ffi::OsString;
use std::path::PathBuf;

/// Application data root.
#[must_use]
pub fn data_dir() -> PathBuf {
    data_dir_with(std::env::var_os("TSUNDOKU_DATA_DIR"))
}

fn data_dir_with(override_dir: Option<OsString>) -> PathBuf {
    if let Some(override_dir) = override_dir {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("tsundoku"))
        .unwrap_or_else(|| PathBuf::from("/tmp/tsundoku-data"))
}

/// Application config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    config_dir_with(
        std::env::var_os("TSUNDOKU_CONFIG_DIR"),
        std::env::var_os("XDG_CONFIG_HOME"),
    )
}

fn config_dir_with(override_dir: Option<OsString>, xdg: Option<OsString>) -> PathBuf {
    if let Some(override_dir) = override_dir {
        return PathBuf::from(override_dir);
    }
    if let Some(xdg) = xdg {
        return PathBuf::from(xdg).join("tsundoku");
    }
    dirs::config_dir()
        .map(|d| d.join("tsundoku"))
        .unwrap_or_else(|| PathBuf::from("/tmp/tsundoku-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default root of the local source (`data_dir()/local/`).
#[must_use]
pub fn local_library_dir() -> PathBuf {
    local_library_dir_in(data_dir())
}

fn local_library_dir_in(data_dir: PathBuf) -> PathBuf {
    data_dir.join("local")
}
