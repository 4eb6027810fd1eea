use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::SYSTEM_CASCADE_DIRS;

#[derive(Error, Debug)]
pub enum CascadeResolveError {
    #[error("cascade {name} not found (searched: {})", format_searched(.searched))]
    NotFound { name: String, searched: Vec<PathBuf> },
}

fn format_searched(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return "nothing".to_string();
    }
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a cascade file by name.
///
/// Resolution order:
/// 1. `explicit_dir`, when given
/// 2. User data directory (`<data_dir>/face-reader/cascades`)
/// 3. Well-known OpenCV share directories
pub fn resolve(name: &str, explicit_dir: Option<&Path>) -> Result<PathBuf, CascadeResolveError> {
    resolve_in(name, &search_dirs(explicit_dir))
}

/// Resolve `name` against an explicit list of directories, first hit wins.
pub fn resolve_in(name: &str, dirs: &[PathBuf]) -> Result<PathBuf, CascadeResolveError> {
    for dir in dirs {
        let candidate = dir.join(name);
        if candidate.is_file() {
            log::debug!("Resolved cascade {name} at {}", candidate.display());
            return Ok(candidate);
        }
    }
    Err(CascadeResolveError::NotFound {
        name: name.to_string(),
        searched: dirs.to_vec(),
    })
}

/// Directories searched by [`resolve`], in order.
pub fn search_dirs(explicit_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(dir) = explicit_dir {
        dirs.push(dir.to_path_buf());
    }
    if let Some(dir) = user_cascade_dir() {
        dirs.push(dir);
    }
    dirs.extend(SYSTEM_CASCADE_DIRS.iter().map(PathBuf::from));
    dirs
}

/// Platform data directory for user-installed cascades.
///
/// - Linux: `$XDG_DATA_HOME/face-reader/cascades` or `~/.local/share/face-reader/cascades`
/// - macOS: `~/Library/Application Support/face-reader/cascades`
/// - Windows: `%APPDATA%/face-reader/cascades`
pub fn user_cascade_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("face-reader").join("cascades"))
}
