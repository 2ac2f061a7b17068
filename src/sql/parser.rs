//! Recursive-descent parser for the procedural SQL dialect.
//!
//! The entry point is [`Parser::parse`], which lexes the input on demand and
//! parses it into a [`Program`]. Statement dispatch looks at the category of
//! the next token only; there is no backtracking and no error recovery.

use tracing::debug;

use crate::error::{ProcError, Result};
use crate::sql::ast::*;
use crate::sql::lexer::Lexer;
use crate::sql::token::{Token, TokenKind};

const EXPECTED_TYPE: &str = "parameter type (INTEGER or CHAR)";
const EXPECTED_DIRECTION: &str = "parameter direction (IN or OUT)";

/// A recursive-descent parser that pulls tokens from a [`Lexer`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser { lexer }
    }

    /// Parse a script into a program.
    pub fn parse(source: &'a str) -> Result<Program> {
        Parser::new(Lexer::new(source)).parse_program()
    }

    /// Parse statements until end of input.
    pub fn parse_program(&mut self) -> Result<Program> {
        let line = self.lexer.line();
        let mut statements = Vec::new();
        while self.lexer.peek_kind()? != TokenKind::Eof {
            let stmt = self.parse_statement()?;
            debug!(line = stmt.line(), "parsed {stmt}");
            statements.push(stmt);
        }
        Ok(Program { line, statements })
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    /// Consume one whitespace token if it is next.
    fn skip_ignored(&mut self) -> Result<()> {
        if self.lexer.peek_kind()? == TokenKind::Ignored {
            self.lexer.next_token()?;
        }
        Ok(())
    }

    /// Skip optional whitespace, then require a token of the given kind.
    fn expect_spaced(&mut self, kind: TokenKind) -> Result<Token> {
        self.skip_ignored()?;
        self.lexer.expect(kind)
    }

    fn unexpected(&mut self, expected: &str) -> ProcError {
        match self.lexer.peek() {
            Ok(tok) => ProcError::parse(tok.line, expected, tok.describe()),
            Err(err) => err,
        }
    }

    // =======================================================================
    // Statement dispatch
    // =======================================================================

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.lexer.peek_kind()? {
            TokenKind::VarPrefix => self.parse_sigil_assignment(),
            TokenKind::Create => self.parse_procedure().map(Statement::Procedure),
            TokenKind::Name => self.parse_declaration_or_assignment(),
            TokenKind::Begin => {
                let tok = self.lexer.next_token()?;
                Ok(Statement::Begin { line: tok.line })
            }
            TokenKind::Execute => self.parse_execute(),
            TokenKind::End => self.parse_end(),
            TokenKind::Ignored => {
                let tok = self.lexer.next_token()?;
                Ok(Statement::Ignored { line: tok.line })
            }
            TokenKind::Print => self.parse_print(),
            _ => Err(self.unexpected("statement")),
        }
    }

    // =======================================================================
    // Variables and string literals
    // =======================================================================

    /// `$name`
    fn parse_sigil_variable(&mut self) -> Result<Variable> {
        let line = self.lexer.expect(TokenKind::VarPrefix)?.line;
        let name = self.lexer.expect(TokenKind::Name)?.text;
        Ok(Variable::new(line, name))
    }

    /// `"..."`, `'...'`, `""` or `''`.
    fn parse_string(&mut self) -> Result<String> {
        match self.lexer.peek_kind()? {
            TokenKind::DuoQuote | TokenKind::DuoSingleQuote => {
                self.lexer.next_token()?;
                Ok(String::new())
            }
            TokenKind::Quote => self.parse_quoted(TokenKind::Quote, '"'),
            TokenKind::SingleQuote => self.parse_quoted(TokenKind::SingleQuote, '\''),
            _ => Err(self.unexpected("string literal")),
        }
    }

    fn parse_quoted(&mut self, quote: TokenKind, delimiter: char) -> Result<String> {
        self.lexer.expect(quote)?;
        let text = self.lexer.scan_until(delimiter)?;
        self.lexer.expect(quote)?;
        Ok(text)
    }

    // =======================================================================
    // Assignment, declaration, print
    // =======================================================================

    /// `$name = "literal"`, with trailing whitespace consumed.
    fn parse_sigil_assignment(&mut self) -> Result<Statement> {
        let variable = self.parse_sigil_variable()?;
        self.expect_spaced(TokenKind::Equal)?;
        self.skip_ignored()?;
        let literal = self.parse_string()?;
        self.skip_ignored()?;
        Ok(Statement::Assignment {
            line: variable.line,
            variable,
            literal,
        })
    }

    /// `name type;` or `name := 'literal';`
    fn parse_declaration_or_assignment(&mut self) -> Result<Statement> {
        let tok = self.lexer.expect(TokenKind::Name)?;
        let variable = Variable::new(tok.line, tok.text);
        self.skip_ignored()?;

        match self.lexer.peek_kind()? {
            kind if kind.is_type() => {
                let var_type = self.parse_type()?;
                self.expect_spaced(TokenKind::Semicolon)?;
                Ok(Statement::VariableDeclaration {
                    line: variable.line,
                    variable,
                    var_type,
                })
            }
            TokenKind::Colon => {
                self.lexer.next_token()?;
                self.lexer.expect(TokenKind::Equal)?;
                self.skip_ignored()?;
                let literal = self.parse_string()?;
                self.expect_spaced(TokenKind::Semicolon)?;
                Ok(Statement::Assignment {
                    line: variable.line,
                    variable,
                    literal,
                })
            }
            _ => Err(self.unexpected("variable type or ':='")),
        }
    }

    /// `PRINT($name)`
    fn parse_print(&mut self) -> Result<Statement> {
        let line = self.lexer.expect(TokenKind::Print)?.line;
        self.expect_spaced(TokenKind::LeftParen)?;
        self.skip_ignored()?;
        let variable = self.parse_sigil_variable()?;
        self.expect_spaced(TokenKind::RightParen)?;
        self.skip_ignored()?;
        Ok(Statement::Print { line, variable })
    }

    // =======================================================================
    // CREATE OR REPLACE PROCEDURE
    // =======================================================================

    fn parse_procedure(&mut self) -> Result<ProcedureHeader> {
        let line = self.lexer.expect(TokenKind::Create)?.line;
        self.expect_spaced(TokenKind::Or)?;
        self.expect_spaced(TokenKind::Replace)?;
        self.expect_spaced(TokenKind::Procedure)?;
        let tok = self.expect_spaced(TokenKind::Name)?;
        let name = Variable::new(tok.line, tok.text);
        self.expect_spaced(TokenKind::LeftParen)?;
        let params = self.parse_params()?;
        self.expect_spaced(TokenKind::RightParen)?;
        self.expect_spaced(TokenKind::Is)?;
        Ok(ProcedureHeader { line, name, params })
    }

    /// One or more comma-separated parameters.
    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = vec![self.parse_param()?];
        loop {
            self.skip_ignored()?;
            if self.lexer.peek_kind()? != TokenKind::Comma {
                break;
            }
            self.lexer.next_token()?;
            params.push(self.parse_param()?);
        }
        Ok(params)
    }

    /// `name type direction`
    fn parse_param(&mut self) -> Result<Param> {
        let tok = self.expect_spaced(TokenKind::Name)?;
        let variable = Variable::new(tok.line, tok.text);
        self.skip_ignored()?;
        let param_type = self.parse_type()?;
        self.skip_ignored()?;
        let direction = self.parse_direction()?;
        Ok(Param {
            line: variable.line,
            variable,
            param_type,
            direction,
        })
    }

    fn parse_type(&mut self) -> Result<ParamType> {
        if !self.lexer.peek_kind()?.is_type() {
            return Err(self.unexpected(EXPECTED_TYPE));
        }
        let tok = self.lexer.next_token()?;
        tok.text
            .parse::<ParamType>()
            .map_err(|text| ProcError::parse(tok.line, EXPECTED_TYPE, format!("`{text}`")))
    }

    fn parse_direction(&mut self) -> Result<ParamDirection> {
        if !self.lexer.peek_kind()?.is_direction() {
            return Err(self.unexpected(EXPECTED_DIRECTION));
        }
        let tok = self.lexer.next_token()?;
        tok.text
            .parse::<ParamDirection>()
            .map_err(|text| ProcError::parse(tok.line, EXPECTED_DIRECTION, format!("`{text}`")))
    }

    // =======================================================================
    // EXECUTE IMMEDIATE / END
    // =======================================================================

    /// `EXECUTE IMMEDIATE name;`
    fn parse_execute(&mut self) -> Result<Statement> {
        let line = self.lexer.expect(TokenKind::Execute)?.line;
        self.expect_spaced(TokenKind::Immediate)?;
        let tok = self.expect_spaced(TokenKind::Name)?;
        self.expect_spaced(TokenKind::Semicolon)?;
        Ok(Statement::Execute {
            line,
            sql: Variable::new(tok.line, tok.text),
        })
    }

    /// `END` followed by anything up to and including the next `;`.
    fn parse_end(&mut self) -> Result<Statement> {
        let line = self.lexer.expect(TokenKind::End)?.line;
        self.lexer.scan_until(';')?;
        self.lexer.expect(TokenKind::Semicolon)?;
        Ok(Statement::End { line })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "CREATE OR REPLACE PROCEDURE p_demo (p_id integer in, p_name char IN, p_total INTEGER out) IS
  v_sql char;
BEGIN
  v_sql := 'insert into t values (1)';
  EXECUTE IMMEDIATE v_sql;
END p_demo;
";

    /// Parse and drop whitespace placeholders.
    fn parse_significant(input: &str) -> Vec<Statement> {
        Parser::parse(input)
            .unwrap()
            .statements
            .into_iter()
            .filter(|s| !matches!(s, Statement::Ignored { .. }))
            .collect()
    }

    fn parse_one(input: &str) -> Statement {
        let mut stmts = parse_significant(input);
        assert_eq!(stmts.len(), 1, "expected one statement, got {stmts:?}");
        stmts.remove(0)
    }

    #[test]
    fn parse_procedure_header() {
        let stmt = parse_one("CREATE OR REPLACE PROCEDURE p (a integer in, b integer out) IS");
        if let Statement::Procedure(header) = stmt {
            assert_eq!(header.name.name, "p");
            assert_eq!(header.params.len(), 2);
            assert_eq!(header.params[0].variable.name, "a");
            assert_eq!(header.params[0].param_type, ParamType::Integer);
            assert_eq!(header.params[0].direction, ParamDirection::In);
            assert_eq!(header.params[1].variable.name, "b");
            assert_eq!(header.params[1].direction, ParamDirection::Out);
        } else {
            panic!("expected Procedure");
        }
    }

    #[test]
    fn parse_procedure_header_tight_spacing() {
        let stmt = parse_one("create or replace procedure p(a char in,b integer out)is");
        if let Statement::Procedure(header) = stmt {
            assert_eq!(header.params.len(), 2);
            assert_eq!(header.params[0].param_type, ParamType::Char);
        } else {
            panic!("expected Procedure");
        }
    }

    #[test]
    fn parse_procedure_header_across_lines() {
        let stmt = parse_one("CREATE OR REPLACE PROCEDURE p (\n  a integer in,\n  b char out\n) IS");
        if let Statement::Procedure(header) = stmt {
            assert_eq!(header.line, 1);
            assert_eq!(header.params[0].line, 2);
            assert_eq!(header.params[1].line, 3);
        } else {
            panic!("expected Procedure");
        }
    }

    #[test]
    fn invalid_param_type_is_error() {
        let err = Parser::parse("CREATE OR REPLACE PROCEDURE p (a varchar in) IS").unwrap_err();
        match err {
            ProcError::Parse {
                expected, found, ..
            } => {
                assert_eq!(expected, EXPECTED_TYPE);
                assert_eq!(found, "identifier `varchar`");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_param_direction_is_error() {
        let err = Parser::parse("CREATE OR REPLACE PROCEDURE p (a integer inout) IS").unwrap_err();
        assert!(matches!(err, ProcError::Parse { ref expected, .. } if expected == EXPECTED_DIRECTION));
    }

    #[test]
    fn direction_before_type_is_error() {
        assert!(Parser::parse("CREATE OR REPLACE PROCEDURE p (a in integer) IS").is_err());
    }

    #[test]
    fn missing_is_is_error() {
        let err = Parser::parse("CREATE OR REPLACE PROCEDURE p (a integer in)").unwrap_err();
        assert!(matches!(err, ProcError::Lex { line: 1, .. }));
        assert!(err.to_string().contains("lex error: expected keyword IS, found end of input"));
    }

    #[test]
    fn empty_param_list_is_error() {
        assert!(Parser::parse("CREATE OR REPLACE PROCEDURE p () IS").is_err());
    }

    #[test]
    fn parse_variable_declaration() {
        let stmt = parse_one("v_sql char;");
        assert_eq!(
            stmt,
            Statement::VariableDeclaration {
                line: 1,
                variable: Variable::new(1, "v_sql"),
                var_type: ParamType::Char,
            }
        );
    }

    #[test]
    fn parse_colon_assignment() {
        let stmt = parse_one("v_sql := 'select 1' ;");
        assert_eq!(
            stmt,
            Statement::Assignment {
                line: 1,
                variable: Variable::new(1, "v_sql"),
                literal: "select 1".into(),
            }
        );
    }

    #[test]
    fn bare_name_followed_by_equal_is_error() {
        let err = Parser::parse("x = 'a';").unwrap_err();
        assert!(matches!(err, ProcError::Parse { ref expected, .. } if expected == "variable type or ':='"));
    }

    #[test]
    fn parse_sigil_assignment() {
        let stmt = parse_one("$greeting = \"hello world\"\n");
        assert_eq!(
            stmt,
            Statement::Assignment {
                line: 1,
                variable: Variable::new(1, "greeting"),
                literal: "hello world".into(),
            }
        );
    }

    #[test]
    fn sigil_assignment_consumes_trailing_whitespace() {
        let program = Parser::parse("$a = \"x\"   \n$b = 'y'").unwrap();
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statements[1].line(), 2);
    }

    #[test]
    fn empty_string_forms() {
        for input in ["$x = \"\"", "$x = ''", "x := '';", "x := \"\";"] {
            match parse_one(input) {
                Statement::Assignment { literal, .. } => assert_eq!(literal, "", "{input}"),
                other => panic!("expected Assignment for {input}, got {other:?}"),
            }
        }
    }

    #[test]
    fn string_may_span_lines() {
        let program = Parser::parse("$x = \"a\nb\"\nPRINT($x)").unwrap();
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statements[1].line(), 3);
    }

    #[test]
    fn unterminated_string_is_error() {
        let err = Parser::parse("$x = \"oops").unwrap_err();
        assert!(matches!(err, ProcError::Lex { line: 1, .. }));
    }

    #[test]
    fn parse_print() {
        let stmt = parse_one("PRINT ( $x )");
        assert_eq!(
            stmt,
            Statement::Print {
                line: 1,
                variable: Variable::new(1, "x"),
            }
        );
    }

    #[test]
    fn print_requires_sigil() {
        assert!(Parser::parse("print(x)").is_err());
    }

    #[test]
    fn parse_execute_immediate() {
        let stmt = parse_one("EXECUTE IMMEDIATE v_sql ;");
        assert_eq!(
            stmt,
            Statement::Execute {
                line: 1,
                sql: Variable::new(1, "v_sql"),
            }
        );
    }

    #[test]
    fn parse_end_skips_to_semicolon() {
        let program = Parser::parse("BEGIN\nEND p_demo;").unwrap();
        assert_eq!(
            program.statements,
            vec![
                Statement::Begin { line: 1 },
                Statement::Ignored { line: 1 },
                Statement::End { line: 2 },
            ]
        );
    }

    #[test]
    fn end_without_semicolon_is_error() {
        let err = Parser::parse("END").unwrap_err();
        assert!(matches!(err, ProcError::Lex { .. }));
    }

    #[test]
    fn parse_full_procedure() {
        let program = Parser::parse(DEMO).unwrap();
        assert_eq!(program.line, 1);
        let significant: Vec<&Statement> = program
            .statements
            .iter()
            .filter(|s| !matches!(s, Statement::Ignored { .. }))
            .collect();
        assert_eq!(significant.len(), 6);
        assert!(matches!(significant[0], Statement::Procedure(h) if h.params.len() == 3));
        assert!(matches!(significant[1], Statement::VariableDeclaration { line: 2, .. }));
        assert!(matches!(significant[2], Statement::Begin { line: 3 }));
        assert!(matches!(significant[3], Statement::Assignment { line: 4, .. }));
        assert!(matches!(significant[4], Statement::Execute { line: 5, .. }));
        assert!(matches!(significant[5], Statement::End { line: 6 }));
    }

    #[test]
    fn unexpected_leading_token_names_its_line() {
        let err = Parser::parse("BEGIN\n)").unwrap_err();
        match err {
            ProcError::Parse {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, "statement");
                assert_eq!(found, "')'");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn lex_error_aborts_parse() {
        assert!(matches!(Parser::parse("BEGIN\n#"), Err(ProcError::Lex { line: 2, .. })));
    }

    #[test]
    fn parse_empty_input() {
        let program = Parser::parse("").unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn parse_whitespace_only() {
        let program = Parser::parse("   \n\t  ").unwrap();
        assert_eq!(program.statements, vec![Statement::Ignored { line: 1 }]);
    }
}
