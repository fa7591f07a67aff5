//! Project root resolution
//!
//! The driver is installed one directory below the project it prepares
//! (`<root>/scripts/release-prep`), so the root is the parent of the directory
//! holding the canonicalized executable. The caller's working directory plays
//! no part.

use crate::core::error::{PrepError, PrepResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the project root for the currently running executable
pub fn resolve_current() -> PrepResult<PathBuf> {
  let exe = std::env::current_exe().map_err(|e| PrepError::PathResolution {
    path: PathBuf::from("<current executable>"),
    reason: e.to_string(),
  })?;
  resolve_from(&exe)
}

/// Resolve the project root from an executable path
///
/// Symlinks are followed before walking up, so a symlinked driver resolves
/// relative to its real location.
pub fn resolve_from(exe: &Path) -> PrepResult<PathBuf> {
  let canonical = fs::canonicalize(exe).map_err(|e| PrepError::PathResolution {
    path: exe.to_path_buf(),
    reason: e.to_string(),
  })?;

  let script_dir = canonical.parent().ok_or_else(|| PrepError::PathResolution {
    path: canonical.clone(),
    reason: "executable has no containing directory".to_string(),
  })?;

  let root = script_dir.parent().ok_or_else(|| PrepError::PathResolution {
    path: canonical.clone(),
    reason: format!("{} has no parent directory", script_dir.display()),
  })?;

  log::debug!("Resolved project root {} from {}", root.display(), canonical.display());
  Ok(root.to_path_buf())
}
