//! JSON output for the CLI
//!
//! Every command writes exactly one JSON object to stdout:
//! - `{"status":"ok","data":...}`
//! - `{"status":"error","code":...,"message":...[,"details":...]}`

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    write_line(&error_body(err))
}

fn error_body(err: &CliError) -> Value {
    let mut response = json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    });
    if let (Some(details), Some(obj)) = (err.details(), response.as_object_mut()) {
        obj.insert("details".to_string(), details.clone());
    }
    response
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
