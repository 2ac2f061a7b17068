// Code generation: each statement becomes a chunk of Python source.

use crate::config::Config;
use crate::sql::ast::Statement;

/// Translate one statement into Python. Statements with no Python
/// counterpart produce an empty string.
///
/// The procedure signature only lists `in` parameters; `out` parameters
/// have no binding in the emitted function.
pub fn translate_statement(stmt: &Statement, config: &Config) -> String {
    match stmt {
        Statement::Procedure(header) => {
            let params: Vec<&str> = header
                .in_params()
                .map(|p| p.variable.name.as_str())
                .collect();
            format!("def {}({}):\n", header.name.name, params.join(", "))
        }
        Statement::Begin { .. } => format!("{}try:\n", config.indent(1)),
        Statement::Assignment {
            variable, literal, ..
        } => format!(
            "{}{} = {}\n",
            config.indent(2),
            variable.name,
            quote_literal(literal)
        ),
        Statement::Execute { sql, .. } => format!(
            "{}{}.execute({})\n",
            config.indent(2),
            config.connection,
            sql.name
        ),
        Statement::End { .. } => format!(
            "{}except Exception as error:\n{}{}.error(error)\n",
            config.indent(1),
            config.indent(2),
            config.logger
        ),
        Statement::Print { .. }
        | Statement::VariableDeclaration { .. }
        | Statement::Ignored { .. } => String::new(),
    }
}

/// Render a literal as a double-quoted Python string.
fn quote_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() + 2);
    out.push('"');
    for ch in literal.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
