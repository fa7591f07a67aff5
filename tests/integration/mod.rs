//! Integration tests for release-prep
//!
//! The driver binary is copied into a throwaway project (`<tmp>/project/scripts/`)
//! and run against fake `uv` and `cargo` executables that record their
//! arguments and working directory.

#[cfg(unix)]
mod helpers;
