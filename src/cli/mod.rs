//! CLI module for typedstore
//!
//! One record operation per invocation against the store described by the
//! configuration file. Results are written to stdout as a single JSON object;
//! diagnostics go to stderr.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_payload, read_payload, write_error, write_response};
