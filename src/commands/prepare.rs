//! `release-prep` - regenerate changelogs with rooster and refresh the lockfile
//!
//! Runs, from the project root and strictly in order:
//! 1. rooster on the preview section only, into `CHANGELOG-PREVIEW.md`
//! 2. rooster on every other section, into the main changelog
//! 3. `cargo update -p uv`
//!
//! The first failing step stops the run and its exit code becomes ours.
//! Nothing already written is rolled back.
//!
//! Setting `RELEASE_PREP_DRY_RUN` prints the plan instead of running it.

use crate::core::config::PrepConfig;
use crate::core::error::{ConfigError, PrepResult, ToolError};
use crate::core::plan::{CHANGELOG_STATUS, PrepPlan, Step};
use crate::core::root;
use crate::core::runner::{Outcome, ProcessRunner, SystemRunner};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;

/// Environment switch for the dry run
pub const DRY_RUN_ENV: &str = "RELEASE_PREP_DRY_RUN";

/// How a dry run renders the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryRun {
  Text,
  Json,
}

impl DryRun {
  /// Read the dry-run switch from the environment; unset or empty means a real run
  pub fn from_env() -> PrepResult<Option<Self>> {
    match std::env::var_os(DRY_RUN_ENV) {
      Some(value) => Ok(Self::parse(&value.to_string_lossy())?),
      None => Ok(None),
    }
  }

  fn parse(value: &str) -> Result<Option<Self>, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
      "" => Ok(None),
      "1" | "true" | "text" => Ok(Some(DryRun::Text)),
      "json" => Ok(Some(DryRun::Json)),
      _ => Err(ConfigError::Env {
        name: DRY_RUN_ENV.to_string(),
        value: value.to_string(),
      }),
    }
  }
}

/// Run the release-prep driver with the arguments forwarded to rooster
///
/// A real run prints its first status line right after the root is known,
/// so configuration problems already show up under it.
pub fn run_prepare(forwarded: Vec<OsString>) -> PrepResult<()> {
  let root = root::resolve_current()?;
  let dry_run = DryRun::from_env()?;

  let stdout = io::stdout();
  let mut out = stdout.lock();

  match dry_run {
    Some(mode) => {
      let plan = load_plan(&root, &forwarded)?;
      print_plan(&plan, &root, mode, &mut out)
    }
    None => {
      write_status(&mut out, CHANGELOG_STATUS)?;
      let plan = load_plan(&root, &forwarded)?;
      execute_steps(plan.steps_after_status(CHANGELOG_STATUS), &root, &mut SystemRunner, &mut out)
    }
  }
}

fn load_plan(root: &Path, forwarded: &[OsString]) -> PrepResult<PrepPlan> {
  let config = PrepConfig::load(root)?;
  let plan = PrepPlan::build(&config, forwarded);
  log::debug!(
    "Planned {} external steps in {}",
    plan.invocations().count(),
    root.display()
  );
  Ok(plan)
}

/// Execute steps in order, stopping at the first failure
fn execute_steps<R, W>(steps: &[Step], root: &Path, runner: &mut R, out: &mut W) -> PrepResult<()>
where
  R: ProcessRunner,
  W: Write,
{
  for step in steps {
    match step {
      Step::Status(line) => write_status(out, line)?,
      Step::Run(invocation) => {
        let outcome = runner.run(invocation, root).map_err(|e| ToolError::Spawn {
          step: invocation.label.to_string(),
          command: invocation.command_line(),
          reason: e.to_string(),
        })?;

        if let Outcome::Failed(code) = outcome {
          log::debug!("Stopping after failed {} step (exit code {})", invocation.label, code);
          return Err(
            ToolError::Failed {
              step: invocation.label.to_string(),
              command: invocation.command_line(),
              code,
            }
            .into(),
          );
        }
      }
    }
  }

  Ok(())
}

fn write_status<W: Write>(out: &mut W, line: &str) -> PrepResult<()> {
  writeln!(out, "{}", line)?;
  out.flush()?;
  Ok(())
}

/// Print the plan without executing anything
fn print_plan<W: Write>(plan: &PrepPlan, root: &Path, mode: DryRun, out: &mut W) -> PrepResult<()> {
  match mode {
    DryRun::Json => {
      writeln!(out, "{}", serde_json::to_string_pretty(&plan.to_view(root))?)?;
    }
    DryRun::Text => {
      writeln!(out, "DRY RUN: Would execute in {}:", root.display())?;
      for step in &plan.steps {
        match step {
          Step::Status(line) => writeln!(out, "  echo \"{}\"", line)?,
          Step::Run(invocation) => writeln!(out, "  {}", invocation.command_line())?,
        }
      }
    }
  }
  Ok(())
}
