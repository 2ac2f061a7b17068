// Runtime side of the interpreter: each statement updates the live state.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ProcError, Result};
use crate::sql::ast::{ProcedureHeader, Statement};

/// Mutable state carried from one statement to the next.
#[derive(Debug, Default, Clone)]
pub struct RuntimeState {
    pub(super) variables: HashMap<String, String>,
    pub(super) procedure: Option<ProcedureHeader>,
    pub(super) block_start: Option<usize>,
}

/// Apply one statement to the runtime state.
///
/// Returns the value a `PRINT` produced, if any. Every statement kind is
/// matched explicitly so that a new kind cannot slip through unresolved.
pub fn resolve_statement(state: &mut RuntimeState, stmt: &Statement) -> Result<Option<String>> {
    match stmt {
        Statement::Assignment {
            variable, literal, ..
        } => {
            state
                .variables
                .insert(variable.name.clone(), literal.clone());
            Ok(None)
        }
        Statement::Print { line, variable } => match state.variables.get(&variable.name) {
            Some(value) => Ok(Some(value.clone())),
            None => Err(ProcError::UnknownVariable {
                line: *line,
                name: variable.name.clone(),
            }),
        },
        Statement::Procedure(header) => {
            if let Some(previous) = &state.procedure {
                warn!(
                    line = header.line,
                    "procedure {} replaces {} from line {}",
                    header.name.name,
                    previous.name.name,
                    previous.line
                );
            }
            state.procedure = Some(header.clone());
            Ok(None)
        }
        Statement::Begin { line } => {
            state.block_start = Some(*line);
            Ok(None)
        }
        Statement::VariableDeclaration { .. }
        | Statement::Execute { .. }
        | Statement::End { .. }
        | Statement::Ignored { .. } => {
            debug!(line = stmt.line(), "nothing to resolve for {stmt}");
            Ok(None)
        }
    }
}
