//! JSON I/O handling for CLI
//!
//! - Input: one JSON document, from `--data` or stdin
//! - Output: one JSON object on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Parse a payload given on the command line, or read one from stdin
pub fn read_payload(data: Option<&str>) -> CliResult<Value> {
    match data {
        Some(data) => parse_payload(data),
        None => {
            let mut input = String::new();
            io::stdin().lock().read_to_string(&mut input)?;
            parse_payload(&input)
        }
    }
}

/// Parse a JSON payload
pub fn parse_payload(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::invalid_payload("Empty payload"));
    }
    serde_json::from_str(input).map_err(|e| CliError::invalid_payload(e.to_string()))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn write_json(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
