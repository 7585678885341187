//! flatreport CLI entry point
//!
//! A minimal entrypoint that parses CLI arguments, dispatches to CLI
//! commands and exits with non-zero on failure. All logic is delegated
//! to the CLI module.

use flatreport::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
