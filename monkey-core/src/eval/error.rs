use thiserror::Error;

use crate::{environment::prelude::ValueType, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ValueType,
        operator: String,
        right: ValueType,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: String,
        right: ValueType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ValueType,
        operator: String,
        right: ValueType,
    },
    #[error("identifier not found: {name}")]
    IdentifierNotFound { name: String },
    #[error("not a function: {got}")]
    NotAFunction { got: ValueType },
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    WrongArgumentCount {
        expected: usize,
        got: usize,
    },
    #[error("division by zero")]
    DivisionByZero,
}

/// A runtime failure. Once raised it unwinds every enclosing evaluation
/// step; the language has no way to catch it.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub span: SrcSpan,
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, span: SrcSpan) -> Self {
        Self { error, span }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            RuntimeErrorType::TypeMismatch { .. } => ("Operands have different types", vec![]),
            RuntimeErrorType::UnknownPrefixOperator { .. }
            | RuntimeErrorType::UnknownInfixOperator { .. } => ("Operator not supported for these operands", vec![]),
            RuntimeErrorType::IdentifierNotFound { .. } => ("Not bound in this scope", vec![]),
            RuntimeErrorType::NotAFunction { .. } => ("Called here", vec![]),
            RuntimeErrorType::WrongArgumentCount { expected, .. } => {
                ("Called here", vec![format!("The function takes {expected} argument(s)")])
            },
            RuntimeErrorType::DivisionByZero => ("Divisor evaluated to 0", vec![]),
        }
    }
}
