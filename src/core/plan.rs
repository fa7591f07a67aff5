//! Release-prep plan: the ordered list of status lines and external commands
//!
//! Building the plan is pure; nothing is spawned until the plan is executed.
//! Keeping the two apart lets the dry run and the tests see exactly what
//! would run, in order.

use crate::core::config::PrepConfig;
use serde::Serialize;
use std::ffi::OsString;

/// Status line printed before the changelog steps
pub const CHANGELOG_STATUS: &str = "Updating metadata with rooster...";

/// Status line printed before the lockfile step
pub const LOCKFILE_STATUS: &str = "Updating lockfile...";

/// One external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  /// Short name of the step, used in errors and logs
  pub label: &'static str,
  pub program: OsString,
  pub args: Vec<OsString>,
}

impl Invocation {
  fn new(label: &'static str, program: impl Into<OsString>) -> Self {
    Self {
      label,
      program: program.into(),
      args: Vec::new(),
    }
  }

  fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Render as a single display line (lossy for non-UTF-8 arguments)
  pub fn command_line(&self) -> String {
    std::iter::once(&self.program)
      .chain(self.args.iter())
      .map(|s| s.to_string_lossy().into_owned())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// A single plan entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  /// Literal line written to stdout
  Status(&'static str),
  /// External command run in the project root
  Run(Invocation),
}

/// Ordered release-prep plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepPlan {
  pub steps: Vec<Step>,
}

impl PrepPlan {
  /// Build the plan for the given forwarded arguments
  ///
  /// `forwarded` reaches both rooster invocations unchanged and never the
  /// lockfile invocation.
  pub fn build(config: &PrepConfig, forwarded: &[OsString]) -> Self {
    let changelog = &config.changelog;
    let lockfile = &config.lockfile;

    let preview = rooster_release(config, "preview changelog", forwarded)
      .arg("--only-sections")
      .arg(&changelog.preview_section)
      .arg("--changelog-file")
      .arg(&changelog.preview_file)
      .arg("--no-update-pyproject")
      .arg("--no-update-version-files");

    let main = rooster_release(config, "changelog", forwarded)
      .arg("--without-sections")
      .arg(&changelog.preview_section);

    let lock = Invocation::new("lockfile", &lockfile.program)
      .arg("update")
      .arg("-p")
      .arg(&lockfile.package);

    Self {
      steps: vec![
        Step::Status(CHANGELOG_STATUS),
        Step::Run(preview),
        Step::Run(main),
        Step::Status(LOCKFILE_STATUS),
        Step::Run(lock),
      ],
    }
  }

  /// Steps left once `printed` has already gone out as the opening status line
  pub fn steps_after_status(&self, printed: &str) -> &[Step] {
    match self.steps.split_first() {
      Some((Step::Status(first), rest)) if *first == printed => rest,
      _ => &self.steps,
    }
  }

  /// External invocations in execution order
  pub fn invocations(&self) -> impl Iterator<Item = &Invocation> {
    self.steps.iter().filter_map(|step| match step {
      Step::Run(inv) => Some(inv),
      Step::Status(_) => None,
    })
  }

  /// Serializable view of the plan for `--json`-style output
  pub fn to_view(&self, root: &std::path::Path) -> PlanView {
    PlanView {
      root: root.display().to_string(),
      steps: self
        .steps
        .iter()
        .map(|step| match step {
          Step::Status(line) => StepView::Status {
            status: (*line).to_string(),
          },
          Step::Run(inv) => StepView::Run {
            label: inv.label.to_string(),
            program: inv.program.to_string_lossy().into_owned(),
            args: inv.args.iter().map(|a| a.to_string_lossy().into_owned()).collect(),
          },
        })
        .collect(),
    }
  }
}

/// `<runner...> --from <requirement> --isolated -- <rooster> release <forwarded...>`
fn rooster_release(config: &PrepConfig, label: &'static str, forwarded: &[OsString]) -> Invocation {
  let changelog = &config.changelog;
  let (program, runner_args): (&str, &[String]) = match changelog.runner.split_first() {
    Some((program, rest)) => (program.as_str(), rest),
    None => ("uv", &[]),
  };

  Invocation::new(label, program)
    .args(runner_args)
    .arg("--from")
    .arg(changelog.requirement())
    .arg("--isolated")
    .arg("--")
    .arg(&changelog.executable)
    .arg("release")
    .args(forwarded.iter().cloned())
}

#[derive(Debug, Serialize)]
pub struct PlanView {
  pub root: String,
  pub steps: Vec<StepView>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StepView {
  Status {
    status: String,
  },
  Run {
    label: String,
    program: String,
    args: Vec<String>,
  },
}
