//! Abstract syntax tree definitions for the procedural SQL dialect.
//!
//! Every script parsed by the [`super::parser::Parser`] becomes a
//! [`Program`]: an ordered list of [`Statement`]s. The AST is consumed by the
//! interpreter, which resolves each statement against runtime state and then
//! translates it to Python.

use std::fmt;
use std::str::FromStr;

/// A whole script: statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub line: usize,
    pub statements: Vec<Statement>,
}

/// A named reference, written `$name` in assignment and print contexts and
/// bare in declarations and parameter lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub line: usize,
    pub name: String,
}

impl Variable {
    pub fn new(line: usize, name: impl Into<String>) -> Self {
        Variable {
            line,
            name: name.into(),
        }
    }
}

/// Whether a procedure parameter is an input or an output binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDirection {
    In,
    Out,
}

/// The declared type of a parameter or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    Char,
}

/// Parsing a direction or type fails with the rejected text.
impl FromStr for ParamDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" => Ok(ParamDirection::In),
            "out" => Ok(ParamDirection::Out),
            _ => Err(s.to_string()),
        }
    }
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integer" => Ok(ParamType::Integer),
            "char" => Ok(ParamType::Char),
            _ => Err(s.to_string()),
        }
    }
}

/// One `name type direction` entry of a procedure header.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub line: usize,
    pub variable: Variable,
    pub param_type: ParamType,
    pub direction: ParamDirection,
}

/// `CREATE OR REPLACE PROCEDURE name (params) IS`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureHeader {
    pub line: usize,
    pub name: Variable,
    pub params: Vec<Param>,
}

impl ProcedureHeader {
    /// Parameters bound on entry, in declaration order.
    pub fn in_params(&self) -> impl Iterator<Item = &Param> {
        self.params
            .iter()
            .filter(|p| p.direction == ParamDirection::In)
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `$name = "literal"` or `name := 'literal';`.
    Assignment {
        line: usize,
        variable: Variable,
        literal: String,
    },
    /// `PRINT($name)`.
    Print { line: usize, variable: Variable },
    Procedure(ProcedureHeader),
    /// `name type;`
    VariableDeclaration {
        line: usize,
        variable: Variable,
        var_type: ParamType,
    },
    Begin { line: usize },
    /// `EXECUTE IMMEDIATE name;`
    Execute { line: usize, sql: Variable },
    End { line: usize },
    /// Whitespace between statements.
    Ignored { line: usize },
}

impl Statement {
    pub fn line(&self) -> usize {
        match self {
            Statement::Assignment { line, .. }
            | Statement::Print { line, .. }
            | Statement::VariableDeclaration { line, .. }
            | Statement::Begin { line }
            | Statement::Execute { line, .. }
            | Statement::End { line }
            | Statement::Ignored { line } => *line,
            Statement::Procedure(header) => header.line,
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ParamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDirection::In => f.write_str("in"),
            ParamDirection::Out => f.write_str("out"),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Integer => f.write_str("integer"),
            ParamType::Char => f.write_str("char"),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable.name, self.param_type, self.direction)
    }
}

impl fmt::Display for ProcedureHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "Procedure {}({})", self.name.name, params.join(", "))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assignment {
                variable, literal, ..
            } => write!(f, "Assignment {} = {:?}", variable.name, literal),
            Statement::Print { variable, .. } => write!(f, "Print {}", variable.name),
            Statement::Procedure(header) => fmt::Display::fmt(header, f),
            Statement::VariableDeclaration {
                variable, var_type, ..
            } => write!(f, "Declare {} {}", variable.name, var_type),
            Statement::Begin { .. } => f.write_str("Begin"),
            Statement::Execute { sql, .. } => write!(f, "Execute {}", sql.name),
            Statement::End { .. } => f.write_str("End"),
            Statement::Ignored { .. } => f.write_str("Ignored"),
        }
    }
}
