//! Process runner seam
//!
//! The driver only needs "run this command in that directory and tell me how
//! it ended". [`SystemRunner`] does that with `std::process::Command`,
//! inheriting stdin/stdout/stderr so tool output reaches the terminal
//! unmodified.

use crate::core::plan::Invocation;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// How an external command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Success,
  /// Non-zero exit; the code the driver should exit with
  Failed(i32),
}

/// Runs external commands for the driver
pub trait ProcessRunner {
  /// Run `invocation` with `cwd` as working directory and block until it exits
  ///
  /// Returns `Err` only when the program could not be started.
  fn run(&mut self, invocation: &Invocation, cwd: &Path) -> io::Result<Outcome>;
}

/// Runner backed by real child processes
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
  fn run(&mut self, invocation: &Invocation, cwd: &Path) -> io::Result<Outcome> {
    log::debug!("Executing in {}: {}", cwd.display(), invocation.command_line());

    let status = Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(cwd)
      .status()?;

    log::debug!("{} exited with {}", invocation.label, status);
    Ok(outcome_from(status))
  }
}

/// Map an exit status to an [`Outcome`], following shell conventions for signals
fn outcome_from(status: ExitStatus) -> Outcome {
  if status.success() {
    return Outcome::Success;
  }

  if let Some(code) = status.code() {
    return Outcome::Failed(code);
  }

  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
      return Outcome::Failed(128 + signal);
    }
  }

  Outcome::Failed(1)
}
