//! Front end for the procedural SQL dialect.
//!
//! This module contains the token model, the demand-driven lexer, the
//! abstract syntax tree (AST) definitions, and a recursive-descent parser
//! that turns raw script text into a [`Program`].

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};
