//! CLI module for schemaform
//!
//! Provides command-line interface for:
//! - generate: one schema to one page
//! - infer / validate: work with layout specifications directly
//! - batch: a directory of schemas to a directory of pages
//! - spec: the specification store
//! - serve: the playground HTTP server

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, SpecAction};
pub use commands::{batch, generate, infer, run, run_command, serve, spec, validate, GenerateArgs};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
