use thiserror::Error;

use crate::{lexer::prelude::TokenKind, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("expected next token to be {expected}, got {got} instead")]
    UnexpectedToken {
        expected: TokenKind,
        got: TokenKind,
    },
    #[error("no prefix parse function for {kind} found")]
    NoPrefixParseFn { kind: TokenKind },
    #[error("could not parse {literal:?} as integer")]
    InvalidInteger { literal: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    /// Short label for the offending span plus any extra notes.
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::UnexpectedToken { expected, got } => {
                let found = match got {
                    TokenKind::Eof => "the end of input".to_string(),
                    TokenKind::Int => "an integer".to_string(),
                    TokenKind::Ident => "an identifier".to_string(),
                    kind if kind.is_keyword() => format!("the keyword `{}`", kind.as_str().to_lowercase()),
                    kind if kind.is_operator() => format!("the operator `{kind}`"),
                    kind => format!("`{kind}`"),
                };

                ("Not expected this", vec![format!("Found {found}, expected `{expected}`")])
            },
            ParseErrorType::NoPrefixParseFn { .. } => ("Cannot start an expression", vec![]),
            ParseErrorType::InvalidInteger { .. } => ("Invalid integer literal", vec![]),
        }
    }
}
