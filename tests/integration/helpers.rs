//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Records every call to `$FAKE_TOOL_LOG` and fails when `$FAKE_FAIL_MATCH`
/// occurs in "<tool> <args>".
const FAKE_TOOL: &str = r#"#!/bin/sh
{
  printf 'CALL %s\n' "$(basename "$0")"
  printf 'CWD %s\n' "$(pwd -P)"
  for arg in "$@"; do
    printf 'ARG %s\n' "$arg"
  done
  printf 'END\n'
} >> "$FAKE_TOOL_LOG"

if [ -n "${FAKE_FAIL_MATCH:-}" ]; then
  case "$(basename "$0") $*" in
    *"$FAKE_FAIL_MATCH"*) exit "${FAKE_FAIL_CODE:-1}" ;;
  esac
fi
exit 0
"#;

/// One recorded external call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
  pub tool: String,
  pub cwd: PathBuf,
  pub args: Vec<String>,
}

/// A throwaway project with the driver installed under `scripts/`
pub struct TestProject {
  root: TempDir,
  /// Canonical project root
  pub path: PathBuf,
  /// Installed driver (`<path>/scripts/release-prep`)
  pub driver: PathBuf,
  /// Directory holding the fake tools
  pub fake_bin: PathBuf,
  log: PathBuf,
}

impl TestProject {
  /// Create a project with the driver and fake `uv`/`cargo` installed
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("project");
    let scripts = path.join("scripts");
    std::fs::create_dir_all(&scripts)?;
    let path = std::fs::canonicalize(&path)?;

    let driver = scripts.join("release-prep");
    std::fs::copy(env!("CARGO_BIN_EXE_release-prep"), &driver).context("Failed to install release-prep")?;

    let fake_bin = root.path().join("fake-bin");
    std::fs::create_dir_all(&fake_bin)?;
    for tool in ["uv", "cargo"] {
      let tool_path = fake_bin.join(tool);
      std::fs::write(&tool_path, FAKE_TOOL)?;
      std::fs::set_permissions(&tool_path, std::fs::Permissions::from_mode(0o755))?;
    }

    std::fs::write(path.join("CHANGELOG.md"), "# Changelog\n")?;
    let log = root.path().join("calls.log");

    Ok(Self {
      root,
      path,
      driver: std::fs::canonicalize(driver)?,
      fake_bin,
      log,
    })
  }

  /// A directory outside the project to run the driver from
  pub fn elsewhere(&self) -> Result<PathBuf> {
    let dir = self.root.path().join("elsewhere");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
  }

  /// Write a file relative to the project root
  pub fn write(&self, rel: &str, content: &str) -> Result<()> {
    let file = self.path.join(rel);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file, content)?;
    Ok(())
  }

  /// Command for the installed driver with fake tools first on PATH
  pub fn command(&self, program: &Path, cwd: &Path) -> Command {
    let path = match std::env::var_os("PATH") {
      Some(existing) => {
        let mut joined = self.fake_bin.clone().into_os_string();
        joined.push(":");
        joined.push(existing);
        joined
      }
      None => self.fake_bin.clone().into_os_string(),
    };

    let mut cmd = Command::new(program);
    cmd
      .current_dir(cwd)
      .env("PATH", path)
      .env("FAKE_TOOL_LOG", &self.log)
      .env_remove("FAKE_FAIL_MATCH")
      .env_remove("FAKE_FAIL_CODE")
      .env_remove("RELEASE_PREP_DRY_RUN")
      .env_remove("RELEASE_PREP_LOG");
    cmd
  }

  /// Run the installed driver from `cwd`
  pub fn run<I, S>(&self, cwd: &Path, args: I) -> Result<Output>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    let mut cmd = self.command(&self.driver, cwd);
    cmd.args(args);
    output_with_retry(&mut cmd)
  }

  /// Calls recorded by the fake tools, in order
  pub fn calls(&self) -> Result<Vec<Call>> {
    if !self.log.exists() {
      return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&self.log)?;
    let mut calls = Vec::new();
    let mut current: Option<Call> = None;

    for line in content.lines() {
      if let Some(tool) = line.strip_prefix("CALL ") {
        current = Some(Call {
          tool: tool.to_string(),
          cwd: PathBuf::new(),
          args: Vec::new(),
        });
      } else if let Some(cwd) = line.strip_prefix("CWD ") {
        if let Some(call) = current.as_mut() {
          call.cwd = PathBuf::from(cwd);
        }
      } else if let Some(arg) = line.strip_prefix("ARG ") {
        if let Some(call) = current.as_mut() {
          call.args.push(arg.to_string());
        }
      } else if line == "END" {
        calls.extend(current.take());
      }
    }

    Ok(calls)
  }
}

/// Run a freshly written executable, retrying while the kernel still sees it
/// open for writing (ETXTBSY from a concurrent fork in another test thread).
pub fn output_with_retry(cmd: &mut Command) -> Result<Output> {
  const ETXTBSY: i32 = 26;

  let mut attempts = 0;
  loop {
    match cmd.output() {
      Err(e) if e.raw_os_error() == Some(ETXTBSY) && attempts < 20 => {
        attempts += 1;
        std::thread::sleep(std::time::Duration::from_millis(50));
      }
      result => return result.context("Failed to run release-prep"),
    }
  }
}

/// stdout as a String
pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

/// stderr as a String
pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
