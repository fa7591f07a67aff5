//! Core engine for release-prep
//!
//! - **config**: optional release-prep.toml parsing and validation
//! - **error**: error types with exit codes and contextual help messages
//! - **plan**: the ordered status lines and external commands
//! - **root**: project root resolution from the executable's location
//! - **runner**: process spawning behind the `ProcessRunner` seam

pub mod config;
pub mod error;
pub mod plan;
pub mod root;
pub mod runner;
