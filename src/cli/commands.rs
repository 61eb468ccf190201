//! Command execution
//!
//! Every invocation opens the store from the configuration file, runs one
//! command, and prints exactly one JSON response. Failures are printed as
//! error responses and also returned so the process exits non-zero.

use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::StoreConfig;
use crate::store::{Storage, StoreResult};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_payload, write_error, write_response};

/// Run the CLI with parsed arguments
pub fn run() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run a parsed command, printing its response
pub fn run_command(cli: Cli) -> CliResult<()> {
    match prepare(&cli) {
        Ok((storage, payload)) => match execute(&storage, &cli.command, payload) {
            Ok(data) => write_response(data),
            Err(e) => {
                write_error(e.code(), &e.to_string())?;
                Err(CliError::command_failed(&e))
            }
        },
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Execute one command against an open store.
///
/// `payload` is required for `create` and `update` and ignored otherwise.
pub fn execute(storage: &Storage, command: &Command, payload: Option<Value>) -> StoreResult<Value> {
    debug!(?command, "executing");

    let data = match command {
        Command::Create {
            type_name, name, ..
        } => storage.create(type_name, name, &payload.unwrap_or(Value::Null))?,
        Command::Update {
            type_name, name, ..
        } => storage.update(type_name, name, &payload.unwrap_or(Value::Null))?,
        Command::Delete { type_name, name } => {
            storage.delete(type_name, name)?;
            Value::Null
        }
        Command::Exists { type_name, name } => Value::Bool(storage.exists(type_name, name)?),
        Command::Get { type_name, name } => storage.get(type_name, name)?,
        Command::Lookup { type_name, name } => {
            storage.lookup(type_name, name)?.unwrap_or(Value::Null)
        }
        Command::List { type_name } => Value::from(storage.list(type_name)?),
        Command::Schemas => Value::from(storage.schema().types()),
    };

    Ok(data)
}

fn prepare(cli: &Cli) -> CliResult<(Storage, Option<Value>)> {
    let config = StoreConfig::load(&cli.config)?;
    let storage = Storage::open(&config).map_err(|e| CliError::open_failed(&e))?;

    let payload = match &cli.command {
        Command::Create { data, .. } | Command::Update { data, .. } => {
            Some(read_payload(data.as_deref())?)
        }
        _ => None,
    };

    Ok((storage, payload))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
