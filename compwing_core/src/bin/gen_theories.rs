//! Write THEORIES.md from the property registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-theories
//! cargo run --bin gen-theories -- path/to/THEORIES.md
//! ```
//!
//! Without an argument the file goes to `compwing_core/THEORIES.md`
//! (relative to the workspace root).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use compwing_core::micromechanics::generate_theories_markdown;

const DEFAULT_OUTPUT: &str = "compwing_core/THEORIES.md";

fn main() -> ExitCode {
    let output_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let markdown = generate_theories_markdown();

    match fs::write(&output_path, &markdown) {
        Ok(()) => {
            println!("Wrote {} bytes to {}", markdown.len(), output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing {}: {}", output_path.display(), e);
            ExitCode::FAILURE
        }
    }
}
