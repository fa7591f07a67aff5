//! CLI commands for release-prep
//!
//! - **prepare**: regenerate both changelogs with rooster, then refresh the lockfile

pub mod prepare;

pub use prepare::run_prepare;
