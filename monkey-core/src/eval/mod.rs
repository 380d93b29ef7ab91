pub mod error;

use std::{cell::RefCell, rc::Rc};

use tracing::trace;

use crate::{
    environment::prelude::{Environment, Function, Value, NULL},
    parser::prelude::{
        BlockStatement, CallExpression, Expression, IfExpression, InfixExpression,
        PrefixExpression, Program, Statement
    },
    utils::prelude::SrcSpan,
};
use error::{RuntimeError, RuntimeErrorType};

pub type EvalResult<T> = Result<T, RuntimeError>;

/// Outcome of evaluating a statement or expression that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Finished without producing a value (`let`).
    Empty,
    Normal(Value),
    /// A `return` is unwinding towards the nearest function boundary.
    Return(Value),
}

impl Completion {
    pub fn into_value(self) -> Value {
        match self {
            Completion::Empty => NULL,
            Completion::Normal(value) | Completion::Return(value) => value,
        }
    }
}

// Evaluates to the plain value of a completion, handing an unwinding
// `return` straight back to the caller.
macro_rules! value {
    ($completion:expr) => {
        match $completion {
            Completion::Return(value) => return Ok(Completion::Return(value)),
            completion => completion.into_value(),
        }
    };
}

/// Evaluates a whole program. `Ok(None)` means the last statement produced
/// no value, e.g. a `let` binding or an empty program.
#[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
pub fn eval(program: &Program, env: &Rc<RefCell<Environment>>) -> EvalResult<Option<Value>> {
    let mut result = Completion::Empty;

    for statement in &program.statements {
        match eval_statement(statement, env)? {
            Completion::Return(value) => return Ok(Some(value)),
            completion => result = completion,
        }
    }

    Ok(match result {
        Completion::Empty => None,
        completion => Some(completion.into_value()),
    })
}

fn eval_statement(statement: &Statement, env: &Rc<RefCell<Environment>>) -> EvalResult<Completion> {
    match statement {
        Statement::Let(statement) => {
            let value = value!(eval_expression(&statement.value, env)?);

            env.borrow_mut().set(statement.name.value.clone(), value);

            Ok(Completion::Empty)
        },
        Statement::Return(statement) => {
            let value = match &statement.value {
                Some(expression) => value!(eval_expression(expression, env)?),
                None => NULL,
            };

            Ok(Completion::Return(value))
        },
        Statement::Expression(statement) => eval_expression(&statement.expression, env),
        Statement::Block(block) => eval_block(block, env),
    }
}

fn eval_block(block: &BlockStatement, env: &Rc<RefCell<Environment>>) -> EvalResult<Completion> {
    let mut result = Completion::Empty;

    for statement in &block.statements {
        match eval_statement(statement, env)? {
            completion @ Completion::Return(_) => return Ok(completion),
            completion => result = completion,
        }
    }

    Ok(result)
}

fn eval_expression(expression: &Expression, env: &Rc<RefCell<Environment>>) -> EvalResult<Completion> {
    let value = match expression {
        Expression::Integer(integer) => Value::from(integer.value),
        Expression::Boolean(boolean) => Value::from(boolean.value),
        Expression::Identifier(ident) => env.borrow()
            .get(&ident.value)
            .ok_or_else(|| RuntimeError::new(
                RuntimeErrorType::IdentifierNotFound { name: ident.value.clone() },
                ident.token.location,
            ))?,
        Expression::Prefix(prefix) => return eval_prefix(prefix, env),
        Expression::Infix(infix) => return eval_infix(infix, env),
        Expression::If(if_) => return eval_if(if_, env),
        Expression::Function(function) => Value::Function(Rc::new(Function {
            parameters: function.parameters.clone(),
            body: function.body.clone(),
            env: env.clone(),
        })),
        Expression::Call(call) => return eval_call(call, env),
    };

    Ok(Completion::Normal(value))
}

fn eval_prefix(prefix: &PrefixExpression, env: &Rc<RefCell<Environment>>) -> EvalResult<Completion> {
    let right = value!(eval_expression(&prefix.right, env)?);

    let value = match (prefix.operator.as_str(), right) {
        ("!", right) => Value::from(!right.is_truthy()),
        ("-", Value::Integer { value }) => Value::from(value.wrapping_neg()),
        (operator, right) => return Err(RuntimeError::new(
            RuntimeErrorType::UnknownPrefixOperator {
                operator: operator.to_string(),
                right: right._type(),
            },
            prefix.token.location.to(prefix.right.token().location),
        )),
    };

    Ok(Completion::Normal(value))
}

fn eval_infix(infix: &InfixExpression, env: &Rc<RefCell<Environment>>) -> EvalResult<Completion> {
    let left = value!(eval_expression(&infix.left, env)?);
    let right = value!(eval_expression(&infix.right, env)?);

    let span = infix.left.token().location.to(infix.right.token().location);

    let value = match (left, right) {
        (
            Value::Integer { value: left_value },
            Value::Integer { value: right_value }
        ) => eval_integer_infix(&infix.operator, left_value, right_value, span)?,
        (
            Value::Boolean { value: left_value },
            Value::Boolean { value: right_value }
        ) => match infix.operator.as_str() {
            "==" => Value::from(left_value == right_value),
            "!=" => Value::from(left_value != right_value),
            operator => return Err(RuntimeError::new(
                RuntimeErrorType::UnknownInfixOperator {
                    left: Value::from(left_value)._type(),
                    operator: operator.to_string(),
                    right: Value::from(right_value)._type(),
                },
                span,
            )),
        },
        (left, right) if left._type() != right._type() => return Err(RuntimeError::new(
            RuntimeErrorType::TypeMismatch {
                left: left._type(),
                operator: infix.operator.clone(),
                right: right._type(),
            },
            span,
        )),
        (left, right) => return Err(RuntimeError::new(
            RuntimeErrorType::UnknownInfixOperator {
                left: left._type(),
                operator: infix.operator.clone(),
                right: right._type(),
            },
            span,
        )),
    };

    Ok(Completion::Normal(value))
}

// Arithmetic wraps on overflow.
fn eval_integer_infix(operator: &str, left: i64, right: i64, span: SrcSpan) -> EvalResult<Value> {
    Ok(match operator {
        "+" => Value::from(left.wrapping_add(right)),
        "-" => Value::from(left.wrapping_sub(right)),
        "*" => Value::from(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                return Err(RuntimeError::new(RuntimeErrorType::DivisionByZero, span));
            }

            Value::from(left.wrapping_div(right))
        },
        "<" => Value::from(left < right),
        ">" => Value::from(left > right),
        "==" => Value::from(left == right),
        "!=" => Value::from(left != right),
        operator => return Err(RuntimeError::new(
            RuntimeErrorType::UnknownInfixOperator {
                left: Value::from(left)._type(),
                operator: operator.to_string(),
                right: Value::from(right)._type(),
            },
            span,
        )),
    })
}

fn eval_if(if_: &IfExpression, env: &Rc<RefCell<Environment>>) -> EvalResult<Completion> {
    let condition = value!(eval_expression(&if_.condition, env)?);

    let completion = if condition.is_truthy() {
        eval_block(&if_.consequence, env)?
    } else if let Some(alternative) = &if_.alternative {
        eval_block(alternative, env)?
    } else {
        Completion::Empty
    };

    Ok(match completion {
        Completion::Empty => Completion::Normal(NULL),
        completion => completion,
    })
}

fn eval_call(call: &CallExpression, env: &Rc<RefCell<Environment>>) -> EvalResult<Completion> {
    let function = match value!(eval_expression(&call.function, env)?) {
        Value::Function(function) => function,
        other => return Err(RuntimeError::new(
            RuntimeErrorType::NotAFunction { got: other._type() },
            call.function.token().location.to(call.token.location),
        )),
    };

    let mut arguments = Vec::with_capacity(call.arguments.len());

    for argument in &call.arguments {
        arguments.push(value!(eval_expression(argument, env)?));
    }

    let value = apply_function(&function, arguments, call.token.location)?;

    Ok(Completion::Normal(value))
}

/// Runs `function` in a fresh scope enclosed by the scope it was defined in,
/// so free variables resolve lexically rather than at the call site.
fn apply_function(function: &Function, arguments: Vec<Value>, span: SrcSpan) -> EvalResult<Value> {
    if arguments.len() != function.parameters.len() {
        return Err(RuntimeError::new(
            RuntimeErrorType::WrongArgumentCount {
                expected: function.parameters.len(),
                got: arguments.len(),
            },
            span,
        ));
    }

    trace!(arity = arguments.len(), "apply function");

    let mut scope = Environment::new_enclosed(function.env.clone());

    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        scope.set(parameter.value.clone(), argument);
    }

    let scope = Rc::new(RefCell::new(scope));

    // `return` stops unwinding here.
    Ok(eval_block(&function.body, &scope)?.into_value())
}
