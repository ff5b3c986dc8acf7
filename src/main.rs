//! schemaform CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors have already
//! been written to stdout as a JSON response; main repeats them on stderr
//! and exits non-zero.

use schemaform::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
