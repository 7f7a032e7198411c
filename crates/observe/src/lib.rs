//! Initialization logic for logging, shared by the binaries and tests of
//! the workspace.
pub mod config;
pub mod tracing;
