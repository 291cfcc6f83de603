//! Sift CLI library.
//!
//! This library provides the core functionality for the `sift` command-line
//! interface, including configuration loading, component wiring, command
//! execution, and output formatting.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use app::App;
pub use cli::{Cli, Command};
pub use config::SiftConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
