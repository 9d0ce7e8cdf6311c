//! Recursive-descent parser for OpenQASM 2.0
//!
//! The parser keeps going after an error: it records a positioned
//! diagnostic, skips to the next statement boundary (`;` or `}`), and
//! resumes, so one run reports every problem in the file.

use crate::ast::{
    BinOp, Expression, GateCall, GateDef, Program, RegRef, Statement, StatementKind,
};
use crate::error::{Diagnostic, ParseError, ParseResult};
use crate::lexer::{tokenize, LineIndex, SpannedToken, Token};

/// Parse a source string into an AST
pub fn parse_ast(source: &str) -> ParseResult<Program> {
    Parser::new(source).parse_program()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    index: LineIndex,
    diagnostics: Vec<Diagnostic>,
    source_len: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        let index = LineIndex::new(source);
        let mut diagnostics = Vec::new();
        let mut tokens = Vec::new();

        for result in tokenize(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err((span, message)) => {
                    let (line, column) = index.position(span.start);
                    diagnostics.push(Diagnostic::new(line, column, message));
                }
            }
        }

        Self {
            tokens,
            pos: 0,
            index,
            diagnostics,
            source_len: source.len(),
        }
    }

    fn parse_program(mut self) -> ParseResult<Program> {
        let version = self.parse_header().unwrap_or_else(|| "2.0".to_string());

        let mut statements = Vec::new();
        while !self.at_eof() {
            match self.parse_statement() {
                Some(statement) => statements.push(statement),
                None => self.synchronize(),
            }
        }

        if self.diagnostics.is_empty() {
            Ok(Program {
                version,
                statements,
            })
        } else {
            Err(ParseError::new(self.diagnostics))
        }
    }

    // ---- token plumbing -------------------------------------------------

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Position of the token at `pos`, or end of input
    fn position_of(&self, pos: usize) -> (usize, usize) {
        match self.tokens.get(pos) {
            Some(t) => self.index.position(t.span.start),
            None => self.index.position(self.source_len.saturating_sub(1)),
        }
    }

    fn current_position(&self) -> (usize, usize) {
        self.position_of(self.pos)
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let (line, column) = self.current_position();
        self.diagnostics.push(Diagnostic::new(line, column, message));
    }

    /// Expect a specific token, recording a diagnostic on mismatch
    fn expect(&mut self, expected: &Token) -> bool {
        if self.consume(expected) {
            return true;
        }
        let found = match self.peek() {
            Some(token) => format!("'{}'", token),
            None => "end of input".to_string(),
        };
        self.error_here(format!("expected '{}', found {}", expected, found));
        false
    }

    /// Skip to the next statement boundary after an error
    fn synchronize(&mut self) {
        while let Some(token) = self.advance() {
            if matches!(token, Token::Semicolon | Token::RBrace) {
                return;
            }
        }
    }

    // ---- grammar --------------------------------------------------------

    fn parse_header(&mut self) -> Option<String> {
        if !self.expect(&Token::OpenQasm) {
            self.synchronize();
            return None;
        }
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => v,
            Some(Token::IntLiteral(v)) => v as f64,
            _ => {
                self.error_here("expected version number after OPENQASM");
                self.synchronize();
                return None;
            }
        };
        if (version - 2.0).abs() > 1e-9 {
            self.error_here(format!("unsupported OPENQASM version {version}"));
        }
        self.expect(&Token::Semicolon);
        Some("2.0".to_string())
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        let (line, column) = self.current_position();
        let kind = if self.check(&Token::Include) {
            self.parse_include()
        } else if self.check(&Token::Qreg) {
            self.parse_reg_decl(true)
        } else if self.check(&Token::Creg) {
            self.parse_reg_decl(false)
        } else if self.check(&Token::Gate) {
            self.parse_gate_def()
        } else if self.check(&Token::Measure) {
            self.parse_measure()
        } else if self.check(&Token::Reset) {
            self.parse_reset()
        } else if self.check(&Token::Barrier) {
            self.parse_barrier()
        } else if self.check(&Token::If) {
            self.parse_if()
        } else if matches!(self.peek(), Some(Token::Identifier(_))) {
            self.parse_gate_call().map(StatementKind::GateCall)
        } else {
            let found = self.peek().map(Token::to_string)?;
            self.error_here(format!("unexpected token '{}'", found));
            return None;
        }?;
        Some(Statement { kind, line, column })
    }

    fn parse_include(&mut self) -> Option<StatementKind> {
        self.advance(); // include
        let path = match self.advance() {
            Some(Token::StringLiteral(path)) => path,
            _ => {
                self.error_here("expected string literal after 'include'");
                return None;
            }
        };
        self.expect(&Token::Semicolon).then_some(())?;
        Some(StatementKind::Include { path })
    }

    fn parse_reg_decl(&mut self, quantum: bool) -> Option<StatementKind> {
        self.advance(); // qreg | creg
        let name = self.parse_identifier()?;
        self.expect(&Token::LBracket).then_some(())?;
        let size = self.parse_int()?;
        self.expect(&Token::RBracket).then_some(())?;
        self.expect(&Token::Semicolon).then_some(())?;

        if size == 0 {
            // Recoverable: report and keep the declaration so the rest of
            // the file still gets checked.
            self.error_here(format!("register '{name}' must have positive width"));
        }

        let size = size as u32;
        Some(if quantum {
            StatementKind::QregDecl { name, size }
        } else {
            StatementKind::CregDecl { name, size }
        })
    }

    fn parse_gate_def(&mut self) -> Option<StatementKind> {
        self.advance(); // gate
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            if self.check(&Token::RParen) {
                self.advance();
                Vec::new()
            } else {
                let params = self.parse_identifier_list()?;
                self.expect(&Token::RParen).then_some(())?;
                params
            }
        } else {
            Vec::new()
        };

        let qubits = self.parse_identifier_list()?;
        self.expect(&Token::LBrace).then_some(())?;

        let mut body = Vec::new();
        while !self.check(&Token::RBrace) && !self.at_eof() {
            let (line, column) = self.current_position();
            let kind = if matches!(self.peek(), Some(Token::Identifier(_))) {
                self.parse_gate_call().map(StatementKind::GateCall)
            } else if self.check(&Token::Barrier) {
                self.parse_barrier()
            } else {
                self.error_here("gate bodies may only contain gate calls and barriers");
                None
            };
            match kind {
                Some(kind) => body.push(Statement { kind, line, column }),
                None => self.synchronize_in_body(),
            }
        }
        self.expect(&Token::RBrace).then_some(())?;

        Some(StatementKind::GateDef(GateDef {
            name,
            params,
            qubits,
            body,
        }))
    }

    /// Like `synchronize`, but stops before the closing brace so the
    /// gate-definition loop can terminate cleanly
    fn synchronize_in_body(&mut self) {
        while !self.at_eof() {
            if self.check(&Token::RBrace) {
                return;
            }
            if matches!(self.advance(), Some(Token::Semicolon)) {
                return;
            }
        }
    }

    fn parse_measure(&mut self) -> Option<StatementKind> {
        self.advance(); // measure
        let qubit = self.parse_reg_ref()?;
        self.expect(&Token::Arrow).then_some(())?;
        let cbit = self.parse_reg_ref()?;
        self.expect(&Token::Semicolon).then_some(())?;
        Some(StatementKind::Measure { qubit, cbit })
    }

    fn parse_reset(&mut self) -> Option<StatementKind> {
        self.advance(); // reset
        let qubit = self.parse_reg_ref()?;
        self.expect(&Token::Semicolon).then_some(())?;
        Some(StatementKind::Reset { qubit })
    }

    fn parse_barrier(&mut self) -> Option<StatementKind> {
        self.advance(); // barrier
        let mut qubits = vec![self.parse_reg_ref()?];
        while self.consume(&Token::Comma) {
            qubits.push(self.parse_reg_ref()?);
        }
        self.expect(&Token::Semicolon).then_some(())?;
        Some(StatementKind::Barrier { qubits })
    }

    fn parse_if(&mut self) -> Option<StatementKind> {
        self.advance(); // if
        self.expect(&Token::LParen).then_some(())?;
        let creg = self.parse_identifier()?;
        self.expect(&Token::EqEq).then_some(())?;
        let value = self.parse_int()?;
        self.expect(&Token::RParen).then_some(())?;
        let call = self.parse_gate_call()?;
        Some(StatementKind::If { creg, value, call })
    }

    fn parse_gate_call(&mut self) -> Option<GateCall> {
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            if self.check(&Token::RParen) {
                self.advance();
                Vec::new()
            } else {
                let mut params = vec![self.parse_expression()?];
                while self.consume(&Token::Comma) {
                    params.push(self.parse_expression()?);
                }
                self.expect(&Token::RParen).then_some(())?;
                params
            }
        } else {
            Vec::new()
        };

        let mut qubits = vec![self.parse_reg_ref()?];
        while self.consume(&Token::Comma) {
            qubits.push(self.parse_reg_ref()?);
        }
        self.expect(&Token::Semicolon).then_some(())?;

        Some(GateCall {
            name,
            params,
            qubits,
        })
    }

    fn parse_reg_ref(&mut self) -> Option<RegRef> {
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_int()?;
            self.expect(&Token::RBracket).then_some(())?;
            Some(RegRef::indexed(register, index as u32))
        } else {
            Some(RegRef::whole(register))
        }
    }

    fn parse_identifier(&mut self) -> Option<String> {
        if matches!(self.peek(), Some(Token::Identifier(_))) {
            match self.advance() {
                Some(Token::Identifier(name)) => Some(name),
                _ => unreachable!("peek saw an identifier"),
            }
        } else {
            let found = match self.peek() {
                Some(token) => format!("'{}'", token),
                None => "end of input".to_string(),
            };
            self.error_here(format!("expected identifier, found {}", found));
            None
        }
    }

    fn parse_int(&mut self) -> Option<u64> {
        if matches!(self.peek(), Some(Token::IntLiteral(_))) {
            match self.advance() {
                Some(Token::IntLiteral(value)) => Some(value),
                _ => unreachable!("peek saw an integer"),
            }
        } else {
            let found = match self.peek() {
                Some(token) => format!("'{}'", token),
                None => "end of input".to_string(),
            };
            self.error_here(format!("expected integer, found {}", found));
            None
        }
    }

    fn parse_identifier_list(&mut self) -> Option<Vec<String>> {
        let mut names = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            names.push(self.parse_identifier()?);
        }
        Some(names)
    }

    // Expressions: expr := term (('+'|'-') term)*
    //              term := factor (('*'|'/') factor)*
    //              factor := '-' factor | primary

    fn parse_expression(&mut self) -> Option<Expression> {
        let mut left = self.parse_term()?;
        loop {
            let op = if self.consume(&Token::Plus) {
                BinOp::Add
            } else if self.consume(&Token::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let right = self.parse_term()?;
            left = Expression::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn parse_term(&mut self) -> Option<Expression> {
        let mut left = self.parse_factor()?;
        loop {
            let op = if self.consume(&Token::Star) {
                BinOp::Mul
            } else if self.consume(&Token::Slash) {
                BinOp::Div
            } else {
                break;
            };
            let right = self.parse_factor()?;
            left = Expression::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn parse_factor(&mut self) -> Option<Expression> {
        if self.consume(&Token::Minus) {
            return Some(Expression::Neg(Box::new(self.parse_factor()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<Expression> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Some(Expression::Int(v as i64)),
            Some(Token::FloatLiteral(v)) => Some(Expression::Float(v)),
            Some(Token::Pi) => Some(Expression::Pi),
            Some(Token::LParen) => {
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen).then_some(())?;
                Some(inner)
            }
            Some(Token::Identifier(name)) => {
                if self.consume(&Token::LParen) {
                    let mut args = vec![self.parse_expression()?];
                    while self.consume(&Token::Comma) {
                        args.push(self.parse_expression()?);
                    }
                    self.expect(&Token::RParen).then_some(())?;
                    Some(Expression::Call { name, args })
                } else {
                    Some(Expression::Ident(name))
                }
            }
            Some(found) => {
                let (line, column) = self.position_of(self.pos - 1);
                self.diagnostics.push(Diagnostic::new(
                    line,
                    column,
                    format!("expected expression, found '{}'", found),
                ));
                None
            }
            None => {
                self.error_here("expected expression, found end of input");
                None
            }
        }
    }
}
