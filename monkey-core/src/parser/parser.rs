use tracing::{debug, trace};

use crate::{lexer::prelude::{Lexer, Token, TokenKind}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Expression, Program, Statement};

pub trait Parse<T: Iterator<Item = Token>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = Token>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

/// Pratt parser over a pull-based token stream. Keeps a two token window
/// (`current_token`, `peek_token`) that always advances in lockstep.
pub struct Parser<T: Iterator<Item = Token>> {
    pub current_token: Token,
    pub peek_token: Token,

    errors: Vec<ParseError>,
    tokens: T,
}

impl<T: Iterator<Item = Token>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: Token::eof(0),
            peek_token: Token::eof(0),
            errors: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let next = match self.tokens.next() {
            Some(token) => token,
            None => Token::eof(self.peek_token.location.end),
        };

        self.current_token = std::mem::replace(&mut self.peek_token, next);
    }

    pub fn current_is(&self, kind: TokenKind) -> bool {
        self.current_token.is(kind)
    }

    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.is(kind)
    }

    /// Advances only if the lookahead token has the required kind.
    pub fn expect_peek(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.peek_is(kind) {
            self.step();
            return Ok(());
        }

        parse_error(
            ParseErrorType::UnexpectedToken {
                expected: kind,
                got: self.peek_token.kind,
            },
            self.peek_token.location
        )
    }

    /// Moves onto the `;` ending the current statement. Stops early at end of
    /// input, or in front of a `}` so the enclosing block can still close.
    pub fn skip_to_semicolon(&mut self) {
        while !self.current_is(TokenKind::Semicolon)
            && !self.current_is(TokenKind::Eof)
            && !self.peek_is(TokenKind::RBrace)
        {
            self.step();
        }
    }

    pub fn current_precedence(&self) -> Precedence {
        Precedence::from(self.current_token.kind)
    }

    pub fn peek_precedence(&self) -> Precedence {
        Precedence::from(self.peek_token.kind)
    }

    pub fn record(&mut self, error: ParseError) {
        debug!(%error, span = %error.span, "syntax error");
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Parses statements until end of input. Malformed statements are
    /// recorded in [`Parser::errors`] and skipped; a program is only usable
    /// when that list is empty.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.current_is(TokenKind::Eof) {
            trace!(token = %self.current_token, "statement");

            match Statement::parse(self, None) {
                Ok(statement) => program.statements.push(statement),
                Err(err) => self.record(err),
            }

            self.step();
        }

        program
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl From<TokenKind> for Precedence {
    fn from(value: TokenKind) -> Self {
        match value {
            TokenKind::Equal | TokenKind::NotEqual => Self::Equals,
            TokenKind::LessThan | TokenKind::GreaterThan => Self::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Self::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Self::Product,
            TokenKind::LParen => Self::Call,
            _ => Self::Lowest,
        }
    }
}

fn finish<T: Iterator<Item = Token>>(mut parser: Parser<T>) -> Result<Program, Vec<ParseError>> {
    let program = parser.parse_program();
    let errors = parser.take_errors();

    if errors.is_empty() {
        Ok(program)
    } else {
        Err(errors)
    }
}

pub fn parse_module(src: &str) -> Result<Program, Vec<ParseError>> {
    finish(Parser::new(Lexer::from_source(src)))
}

pub fn parse_module_from_stream(stream: impl Iterator<Item = char>) -> Result<Program, Vec<ParseError>> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );

    finish(Parser::new(lexer))
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
