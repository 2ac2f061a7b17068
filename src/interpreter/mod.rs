//! # Interpreter and transpiler
//!
//! Walks a parsed [`Program`] one statement at a time. Each statement is
//! first resolved against the runtime state (variable table, current
//! procedure, open block) and then translated to Python, which is appended
//! to the output sink before the next statement is looked at.
//!
//! Nothing is batched or rolled back: when a statement fails, everything
//! emitted for the statements before it stays in the sink.

mod resolve;
mod translate;

pub use resolve::{resolve_statement, RuntimeState};
pub use translate::translate_statement;

use std::io::Write;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::sql::ast::{ProcedureHeader, Program};

/// Everything a run produced, collected in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transpiled {
    /// The emitted Python source.
    pub code: String,
    /// One entry per executed `PRINT`, in order.
    pub printed: Vec<String>,
}

/// Executes and transpiles programs. Each instance owns its own state, so
/// separate runs never observe each other's variables.
#[derive(Debug, Default)]
pub struct Interpreter {
    state: RuntimeState,
    config: Config,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::default()
    }

    pub fn with_config(config: Config) -> Self {
        Interpreter {
            state: RuntimeState::default(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every statement of `program`, writing emitted code to `out` and
    /// handing each printed value to `on_print` as soon as it is produced.
    pub fn run<W, F>(&mut self, program: &Program, out: &mut W, mut on_print: F) -> Result<()>
    where
        W: Write,
        F: FnMut(String) -> Result<()>,
    {
        for stmt in &program.statements {
            if let Some(value) = resolve_statement(&mut self.state, stmt)? {
                on_print(value)?;
            }
            let code = translate_statement(stmt, &self.config);
            if !code.is_empty() {
                debug!(line = stmt.line(), bytes = code.len(), "emitting {stmt}");
                out.write_all(code.as_bytes())?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Run `program` and collect its output in memory.
    pub fn transpile(&mut self, program: &Program) -> Result<Transpiled> {
        let mut code: Vec<u8> = Vec::new();
        let mut printed = Vec::new();
        self.run(program, &mut code, |value| {
            printed.push(value);
            Ok(())
        })?;
        Ok(Transpiled {
            code: String::from_utf8_lossy(&code).into_owned(),
            printed,
        })
    }

    /// The value currently assigned to `name`.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.state.variables.get(name).map(String::as_str)
    }

    /// The most recent procedure header seen.
    pub fn current_procedure(&self) -> Option<&ProcedureHeader> {
        self.state.procedure.as_ref()
    }

    /// Line of the most recent `BEGIN`.
    pub fn block_start(&self) -> Option<usize> {
        self.state.block_start
    }
}
