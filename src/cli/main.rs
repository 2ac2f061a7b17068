//! # procsql CLI
//!
//! Transpiles one script file into a Python procedure file. Values printed by
//! the script go to stdout; diagnostics go to stderr.

mod logging;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use procsql::Config;

#[derive(Parser, Debug)]
#[command(name = "procsql", version, about = "Transpile procedural SQL scripts to Python")]
struct Args {
    /// Script to read.
    input: PathBuf,
    /// File to write the generated Python to.
    output: PathBuf,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let stdout = io::stdout();
    let mut console = stdout.lock();
    let statements = procsql::transpile_file(&args.input, &args.output, &Config::default(), &mut console)
        .with_context(|| {
            format!(
                "failed to transpile {} into {}",
                args.input.display(),
                args.output.display()
            )
        })?;

    tracing::info!(statements, "done");
    Ok(())
}
