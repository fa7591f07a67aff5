mod commands;
mod core;

use clap::Parser;
use crate::core::error::{PrepError, print_error};
use std::ffi::OsString;

/// Prepare a release: regenerate changelogs with rooster and refresh the lockfile
///
/// Every argument is forwarded verbatim to both `rooster release` invocations.
#[derive(Parser)]
#[command(name = "release-prep")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(styles = get_styles())]
struct PrepCli {
  /// Arguments passed through to `rooster release`
  #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
  rooster_args: Vec<OsString>,
}

impl PrepCli {
  /// Parse with an explicit end-of-options marker so that no forwarded
  /// argument (a bare `--` included) is ever taken as one of ours.
  fn parse_forwarded() -> Self {
    let mut argv = std::env::args_os();
    let bin = argv.next().unwrap_or_else(|| OsString::from("release-prep"));
    Self::parse_from(std::iter::once(bin).chain(std::iter::once(OsString::from("--"))).chain(argv))
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
}

fn main() {
  env_logger::Builder::from_env(env_logger::Env::new().filter_or("RELEASE_PREP_LOG", "warn")).init();

  let cli = PrepCli::parse_forwarded();

  if let Err(err) = commands::run_prepare(cli.rooster_args) {
    handle_error(err);
  }
}

fn handle_error(err: PrepError) -> ! {
  if err.is_silent() {
    log::debug!("{}", err);
  } else {
    print_error(&err);
  }
  std::process::exit(err.exit_code());
}
