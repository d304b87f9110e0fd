//! Pactum CLI library.
//!
//! Command-line glue around the extraction pipeline: configuration and
//! credential lookup, batch commands, the interactive review form, and
//! output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod form;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use form::FormState;
pub use output::Formatter;
