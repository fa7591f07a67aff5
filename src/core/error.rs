//! Error types for release-prep with contextual messages and exit codes
//!
//! Every failure the driver can hit maps to one variant here. External tool
//! failures carry the tool's own exit code so the driver can exit with it
//! unchanged; everything else maps to a fixed [`ExitCode`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for failures the driver itself detects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid environment)
  User = 1,
  /// System error (path resolution, I/O)
  System = 2,
  /// The external program could not be started at all
  NotFound = 127,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-prep
#[derive(Debug)]
pub enum PrepError {
  /// The executable's own location could not be turned into a project root
  PathResolution { path: PathBuf, reason: String },

  /// Configuration errors
  Config(ConfigError),

  /// An external tool failed
  ExternalTool(ToolError),

  /// I/O errors
  Io(io::Error),
}

impl PrepError {
  /// Get the exit code this error should surface to the invoker.
  ///
  /// A failed external tool propagates its own code.
  pub fn exit_code(&self) -> i32 {
    match self {
      PrepError::PathResolution { .. } => ExitCode::System.as_i32(),
      PrepError::Config(_) => ExitCode::User.as_i32(),
      PrepError::ExternalTool(e) => e.exit_code(),
      PrepError::Io(_) => ExitCode::System.as_i32(),
    }
  }

  /// Whether the driver should stay silent about this error.
  ///
  /// A tool that ran and failed has already printed its own diagnostics.
  pub fn is_silent(&self) -> bool {
    matches!(self, PrepError::ExternalTool(ToolError::Failed { .. }))
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PrepError::PathResolution { .. } => {
        Some("release-prep must live one directory below the project root (e.g. <root>/scripts/).".to_string())
      }
      PrepError::Config(e) => e.help_message(),
      PrepError::ExternalTool(e) => e.help_message(),
      PrepError::Io(_) => None,
    }
  }
}

impl fmt::Display for PrepError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PrepError::PathResolution { path, reason } => {
        write!(f, "Cannot resolve project root from {}: {}", path.display(), reason)
      }
      PrepError::Config(e) => write!(f, "{}", e),
      PrepError::ExternalTool(e) => write!(f, "{}", e),
      PrepError::Io(e) => write!(f, "I/O error: {}", e),
    }
  }
}

impl std::error::Error for PrepError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PrepError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PrepError {
  fn from(err: io::Error) -> Self {
    PrepError::Io(err)
  }
}

impl From<ConfigError> for PrepError {
  fn from(err: ConfigError) -> Self {
    PrepError::Config(err)
  }
}

impl From<ToolError> for PrepError {
  fn from(err: ToolError) -> Self {
    PrepError::ExternalTool(err)
  }
}

impl From<serde_json::Error> for PrepError {
  fn from(err: serde_json::Error) -> Self {
    PrepError::Io(err.into())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file exists but cannot be read or parsed
  Invalid { path: PathBuf, reason: String },

  /// A field holds a value the driver cannot use
  Field { field: String, reason: String },

  /// Unrecognised value for an environment switch
  Env { name: String, value: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { path, .. } => Some(format!(
        "Fix or remove {}; every key is optional and defaults apply when the file is absent.",
        path.display()
      )),
      ConfigError::Field { field, .. } if field == "changelog.version" => {
        Some("Use a semver requirement such as \">=0.0.7\".".to_string())
      }
      ConfigError::Env { name, .. } => Some(format!("{} accepts 1, true, text or json.", name)),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}:\n{}", path.display(), reason)
      }
      ConfigError::Field { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
      ConfigError::Env { name, value } => {
        write!(f, "Unrecognised value '{}' for {}", value, name)
      }
    }
  }
}

/// External tool failures
#[derive(Debug)]
pub enum ToolError {
  /// The tool ran and exited unsuccessfully
  Failed { step: String, command: String, code: i32 },

  /// The tool could not be started
  Spawn { step: String, command: String, reason: String },
}

impl ToolError {
  fn exit_code(&self) -> i32 {
    match self {
      ToolError::Failed { code, .. } => *code,
      ToolError::Spawn { .. } => ExitCode::NotFound.as_i32(),
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { command, .. } => {
        let program = command.split_whitespace().next().unwrap_or_default();
        Some(format!("Make sure `{}` is installed and on PATH.", program))
      }
      ToolError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Failed { step, command, code } => {
        write!(f, "{} step failed with exit code {}: {}", step, code, command)
      }
      ToolError::Spawn { step, command, reason } => {
        write!(f, "Failed to start {} step ({}): {}", step, command, reason)
      }
    }
  }
}

/// Result type alias for release-prep
pub type PrepResult<T> = Result<T, PrepError>;

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PrepError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
