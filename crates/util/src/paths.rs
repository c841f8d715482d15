//! Filesystem locations used by Swatchbook.
//!
//! Resolution mirrors the usual CLI conventions: explicit argument first, then
//! an environment override, then the platform configuration directory.

use dirs_next::{config_dir, home_dir};
use std::env;
use std::path::PathBuf;

/// Environment variable controlling the palette store location.
pub const PALETTES_PATH_ENV: &str = "SWATCHBOOK_PALETTES_PATH";

/// Environment variable naming the scene file used as the live state.
pub const SCENE_PATH_ENV: &str = "SWATCHBOOK_SCENE";

/// Default filename for the persisted palette store.
pub const PALETTES_FILE_NAME: &str = "palettes.json";

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    // Windows-style separators are accepted too.
    let rest = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\"));
    match rest {
        Some(rest) => home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Location of the palette store when no explicit path is given.
pub fn default_palettes_path() -> PathBuf {
    if let Some(path) = non_empty_env(PALETTES_PATH_ENV) {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swatchbook")
        .join(PALETTES_FILE_NAME)
}

/// Picks the palette store path: `explicit` when provided, otherwise the default.
pub fn resolve_palettes_path(explicit: Option<&str>) -> PathBuf {
    match explicit.map(str::trim).filter(|path| !path.is_empty()) {
        Some(path) => expand_tilde(path),
        None => default_palettes_path(),
    }
}

/// Scene file from `explicit` or [`SCENE_PATH_ENV`], if either is set.
pub fn resolve_scene_path(explicit: Option<&str>) -> Option<PathBuf> {
    explicit
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(expand_tilde)
        .or_else(|| non_empty_env(SCENE_PATH_ENV).map(|path| expand_tilde(&path)))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
