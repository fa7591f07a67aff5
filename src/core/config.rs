use crate::core::error::{ConfigError, PrepResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for release-prep
/// Searched in order: release-prep.toml, .release-prep.toml, .config/release-prep.toml
///
/// Every key is optional; an absent file means all defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrepConfig {
  #[serde(default)]
  pub changelog: ChangelogConfig,
  #[serde(default)]
  pub lockfile: LockfileConfig,
}

/// How rooster is fetched and run
///
/// # Example
///
/// ```toml
/// [changelog]
/// runner = ["uv", "tool", "run"]
/// package = "rooster-blue"
/// version = ">=0.0.7"
/// preview_section = "preview"
/// preview_file = "CHANGELOG-PREVIEW.md"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangelogConfig {
  /// Isolated on-demand tool runner; the first item is the program
  #[serde(default = "default_runner")]
  pub runner: Vec<String>,

  /// Distribution that provides the rooster executable
  #[serde(default = "default_package")]
  pub package: String,

  /// Version requirement for `package`
  #[serde(default = "default_version")]
  pub version: String,

  /// Executable inside `package`
  #[serde(default = "default_executable")]
  pub executable: String,

  /// Section split out into its own changelog
  #[serde(default = "default_preview_section")]
  pub preview_section: String,

  /// Changelog that receives only the preview section (relative to the root)
  #[serde(default = "default_preview_file")]
  pub preview_file: String,
}

fn default_runner() -> Vec<String> {
  vec!["uv".to_string(), "tool".to_string(), "run".to_string()]
}

fn default_package() -> String {
  "rooster-blue".to_string()
}

fn default_version() -> String {
  ">=0.0.7".to_string()
}

fn default_executable() -> String {
  "rooster".to_string()
}

fn default_preview_section() -> String {
  "preview".to_string()
}

fn default_preview_file() -> String {
  "CHANGELOG-PREVIEW.md".to_string()
}

impl Default for ChangelogConfig {
  fn default() -> Self {
    Self {
      runner: default_runner(),
      package: default_package(),
      version: default_version(),
      executable: default_executable(),
      preview_section: default_preview_section(),
      preview_file: default_preview_file(),
    }
  }
}

impl ChangelogConfig {
  /// Requirement passed to the runner's `--from`, e.g. `rooster-blue>=0.0.7`
  pub fn requirement(&self) -> String {
    format!("{}{}", self.package, self.version)
  }
}

/// Which lockfile entry gets refreshed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockfileConfig {
  /// Package manager that owns the lockfile
  #[serde(default = "default_lock_program")]
  pub program: String,

  /// The single dependency whose entry is updated
  #[serde(default = "default_lock_package")]
  pub package: String,
}

fn default_lock_program() -> String {
  "cargo".to_string()
}

fn default_lock_package() -> String {
  "uv".to_string()
}

impl Default for LockfileConfig {
  fn default() -> Self {
    Self {
      program: default_lock_program(),
      package: default_lock_package(),
    }
  }
}

impl PrepConfig {
  /// Find config file in search order: release-prep.toml, .release-prep.toml, .config/release-prep.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("release-prep.toml"),
      root.join(".release-prep.toml"),
      root.join(".config").join("release-prep.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the project root, falling back to defaults when no file exists
  pub fn load(root: &Path) -> PrepResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      log::debug!("No release-prep.toml under {}, using defaults", root.display());
      return Ok(Self::default());
    };

    log::debug!("Loading configuration from {}", config_path.display());
    let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Invalid {
      path: config_path.clone(),
      reason: e.to_string(),
    })?;
    let config = Self::parse(&content).map_err(|reason| ConfigError::Invalid {
      path: config_path.clone(),
      reason,
    })?;

    config.validate()?;
    Ok(config)
  }

  fn parse(content: &str) -> Result<Self, String> {
    toml_edit::de::from_str(content).map_err(|e| e.to_string())
  }

  /// Validate that every value can actually be turned into a command
  pub fn validate(&self) -> Result<(), ConfigError> {
    match self.changelog.runner.first() {
      Some(program) if !program.trim().is_empty() => {}
      _ => return Err(field_error("changelog.runner", "must name a program as its first item")),
    }

    if let Err(e) = semver::VersionReq::parse(&self.changelog.version) {
      return Err(field_error(
        "changelog.version",
        &format!("'{}' is not a version requirement ({})", self.changelog.version, e),
      ));
    }

    let required = [
      ("changelog.package", &self.changelog.package),
      ("changelog.executable", &self.changelog.executable),
      ("changelog.preview_section", &self.changelog.preview_section),
      ("changelog.preview_file", &self.changelog.preview_file),
      ("lockfile.program", &self.lockfile.program),
      ("lockfile.package", &self.lockfile.package),
    ];
    for (field, value) in required {
      if value.trim().is_empty() {
        return Err(field_error(field, "must not be empty"));
      }
    }

    Ok(())
  }
}

fn field_error(field: &str, reason: &str) -> ConfigError {
  ConfigError::Field {
    field: field.to_string(),
    reason: reason.to_string(),
  }
}
