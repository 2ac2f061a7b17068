//! # procsql
//!
//! A front end for a small procedural SQL scripting dialect. Scripts are
//! tokenized, parsed by a recursive-descent parser, and then walked
//! statement by statement: variable assignments and `PRINT`s are executed
//! on the spot, while procedure headers, blocks, assignments and
//! `EXECUTE IMMEDIATE` calls are translated into a Python function.

pub mod error;
pub mod config;
pub mod sql;
pub mod interpreter;

pub use config::Config;
pub use error::{ProcError, Result};
pub use interpreter::{Interpreter, Transpiled};
pub use sql::Program;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

/// Parse and run a script with the default configuration.
pub fn transpile(source: &str) -> Result<Transpiled> {
    let program = sql::parser::Parser::parse(source)?;
    Interpreter::new().transpile(&program)
}

/// Transpile the script at `input` into the file at `output`, writing the
/// values printed by the script to `console`.
///
/// Returns the number of statements processed. The output file is created
/// before the script runs, so a run that fails part-way leaves the code
/// emitted so far on disk.
pub fn transpile_file<W: Write>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &Config,
    console: &mut W,
) -> Result<usize> {
    let input = input.as_ref();
    let output = output.as_ref();
    let source = fs::read_to_string(input)?;
    let program = sql::parser::Parser::parse(&source)?;
    info!(
        input = %input.display(),
        statements = program.statements.len(),
        "parsed script"
    );

    let mut out = BufWriter::new(File::create(output)?);
    let mut interp = Interpreter::with_config(config.clone());
    run_and_flush(&mut interp, &program, &mut out, console)?;

    info!(output = %output.display(), "wrote transpiled procedure");
    Ok(program.statements.len())
}

/// Run `program`, echoing printed values to `console`, and flush `out`
/// whether or not the run succeeded. A failed run takes precedence over a
/// failed flush.
fn run_and_flush<W: Write, P: Write>(
    interp: &mut Interpreter,
    program: &Program,
    out: &mut W,
    console: &mut P,
) -> Result<()> {
    let result = interp.run(program, &mut *out, |value| {
        writeln!(console, "{value}")?;
        Ok(())
    });
    let flushed = out.flush();
    result?;
    flushed?;
    Ok(())
}
