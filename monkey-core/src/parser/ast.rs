use std::fmt::Display;

use crate::{
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::SrcSpan,
};

// program -> { <statement> }
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |statement| statement.token_literal())
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }

        Ok(())
    }
}

// statement -> <let> | <return> | <expression_statement>
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl<T: Iterator<Item = Token>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let statement = match parser.current_token.kind {
            TokenKind::Let => Self::Let(LetStatement::parse(parser, None)?),
            TokenKind::Return => Self::Return(ReturnStatement::parse(parser, None)?),
            _ => Self::Expression(ExpressionStatement::parse(parser, None)?),
        };

        Ok(statement)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Let(statement) => write!(f, "{statement}"),
            Self::Return(statement) => write!(f, "{statement}"),
            Self::Expression(statement) => write!(f, "{statement}"),
            Self::Block(block) => write!(f, "{block}"),
        }
    }
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Self::Let(statement) => &statement.token,
            Self::Return(statement) => &statement.token,
            Self::Expression(statement) => &statement.token,
            Self::Block(block) => &block.token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }

    pub fn location(&self) -> SrcSpan {
        self.token().location
    }
}

// let -> let <identifier> = <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

impl<T: Iterator<Item = Token>> Parse<T> for LetStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();

        parser.expect_peek(TokenKind::Ident)?;
        let name = Identifier::from(parser.current_token.clone());

        parser.expect_peek(TokenKind::Assign)?;
        parser.step();

        let value = Expression::parse(parser, Some(Precedence::Lowest))?;
        parser.skip_to_semicolon();

        Ok(Self { token, name, value })
    }
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} = {};", self.token.literal, self.name, self.value)
    }
}

// return -> return [<expression>] ;
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Option<Expression>,
}

impl<T: Iterator<Item = Token>> Parse<T> for ReturnStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();

        let value = if parser.peek_is(TokenKind::Semicolon)
            || parser.peek_is(TokenKind::Eof)
            || parser.peek_is(TokenKind::RBrace)
        {
            None
        } else {
            parser.step();
            Some(Expression::parse(parser, Some(Precedence::Lowest))?)
        };

        parser.skip_to_semicolon();

        Ok(Self { token, value })
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {value};", self.token.literal),
            None => write!(f, "{};", self.token.literal),
        }
    }
}

// expression_statement -> <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

impl<T: Iterator<Item = Token>> Parse<T> for ExpressionStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();
        let expression = Expression::parse(parser, Some(Precedence::Lowest))?;

        if parser.peek_is(TokenKind::Semicolon) {
            parser.step();
        }

        Ok(Self { token, expression })
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

// block -> { { <statement> } }
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl<T: Iterator<Item = Token>> Parse<T> for BlockStatement {
    /// Expects the current token to be `{` and leaves the parser on the
    /// matching `}`. A malformed statement inside the block is recorded and
    /// skipped so the rest of the block still parses.
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();
        let mut statements = vec![];

        parser.step();

        while !parser.current_is(TokenKind::RBrace) {
            if parser.current_is(TokenKind::Eof) {
                return parse_error(
                    ParseErrorType::UnexpectedToken {
                        expected: TokenKind::RBrace,
                        got: TokenKind::Eof,
                    },
                    parser.current_token.location,
                );
            }

            match Statement::parse(parser, None) {
                Ok(statement) => statements.push(statement),
                Err(err) => parser.record(err),
            }

            parser.step();
        }

        Ok(Self { token, statements })
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }

        Ok(())
    }
}

// expression -> <identifier> | <integer> | <boolean> | <prefix> | <infix>
//             | "(" <expression> ")" | <if> | <function> | <call>
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(Boolean),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
}

impl<T: Iterator<Item = Token>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = precedence.unwrap_or(Precedence::Lowest);

        let mut expr = match parser.current_token.kind {
            TokenKind::Ident => Self::Identifier(Identifier::from(parser.current_token.clone())),
            TokenKind::Int => Self::Integer(IntegerLiteral::parse(parser, None)?),
            TokenKind::True | TokenKind::False => Self::Boolean(Boolean::parse(parser, None)?),
            TokenKind::Bang | TokenKind::Minus => Self::Prefix(PrefixExpression::parse(parser, None)?),
            TokenKind::LParen => {
                parser.step();

                let expression = Expression::parse(parser, Some(Precedence::Lowest))?;
                parser.expect_peek(TokenKind::RParen)?;

                expression
            },
            TokenKind::If => Self::If(IfExpression::parse(parser, None)?),
            TokenKind::Function => Self::Function(FunctionLiteral::parse(parser, None)?),
            kind => return parse_error(
                ParseErrorType::NoPrefixParseFn { kind },
                parser.current_token.location,
            ),
        };

        while !parser.peek_is(TokenKind::Semicolon) && precedence < parser.peek_precedence() {
            expr = match parser.peek_token.kind {
                TokenKind::Plus | TokenKind::Minus | TokenKind::Asterisk |
                TokenKind::Slash | TokenKind::Equal | TokenKind::NotEqual |
                TokenKind::LessThan | TokenKind::GreaterThan => {
                    parser.step();
                    Self::Infix(InfixExpression::parse(parser, expr, None)?)
                },
                TokenKind::LParen => {
                    parser.step();
                    Self::Call(CallExpression::parse(parser, expr, None)?)
                },
                _ => break,
            };
        }

        Ok(expr)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Boolean(boolean) => write!(f, "{boolean}"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::If(if_) => write!(f, "{if_}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Call(call) => write!(f, "{call}"),
        }
    }
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Self::Identifier(ident) => &ident.token,
            Self::Integer(integer) => &integer.token,
            Self::Boolean(boolean) => &boolean.token,
            Self::Prefix(prefix) => &prefix.token,
            Self::Infix(infix) => &infix.token,
            Self::If(if_) => &if_.token,
            Self::Function(function) => &function.token,
            Self::Call(call) => &call.token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }
}

// identifier -> <letter> { <letter> }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<Token> for Identifier {
    fn from(token: Token) -> Self {
        Identifier {
            value: token.literal.clone(),
            token,
        }
    }
}

// integer -> <digit> { <digit> }
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

impl<T: Iterator<Item = Token>> Parse<T> for IntegerLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();

        match parse_integer(&token.literal) {
            Some(value) => Ok(Self { token, value }),
            None => parse_error(
                ParseErrorType::InvalidInteger { literal: token.literal },
                token.location,
            ),
        }
    }
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

/// Converts an integer literal to `i64`, picking the radix from its prefix:
/// `0x`, `0o` and `0b` select hex, octal and binary, a bare leading `0`
/// selects octal and anything else is decimal.
pub fn parse_integer(literal: &str) -> Option<i64> {
    let lower = literal.to_ascii_lowercase();

    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };

    if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }

    i64::from_str_radix(digits, radix).ok()
}

// boolean -> true | false
#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    pub token: Token,
    pub value: bool,
}

impl<T: Iterator<Item = Token>> Parse<T> for Boolean {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        Ok(Self {
            value: parser.current_is(TokenKind::True),
            token: parser.current_token.clone(),
        })
    }
}

impl Display for Boolean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

// prefix -> ( ! | - ) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expression>,
}

impl<T: Iterator<Item = Token>> Parse<T> for PrefixExpression {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();
        parser.step();

        let right = Expression::parse(parser, Some(Precedence::Prefix))?;

        Ok(Self {
            operator: token.literal.clone(),
            token,
            right: Box::new(right),
        })
    }
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

impl<T: Iterator<Item = Token>> InfixParse<T> for InfixExpression {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();
        let precedence = parser.current_precedence();

        parser.step();

        // Same-precedence chains stay left-associative because the right
        // side is parsed at this operator's own precedence.
        let right = Expression::parse(parser, Some(precedence))?;

        Ok(Self {
            operator: token.literal.clone(),
            token,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

// if -> if ( <expression> ) <block> [ else <block> ]
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

impl<T: Iterator<Item = Token>> Parse<T> for IfExpression {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();

        parser.expect_peek(TokenKind::LParen)?;
        parser.step();

        let condition = Expression::parse(parser, Some(Precedence::Lowest))?;

        parser.expect_peek(TokenKind::RParen)?;
        parser.expect_peek(TokenKind::LBrace)?;

        let consequence = BlockStatement::parse(parser, None)?;

        let alternative = if parser.peek_is(TokenKind::Else) {
            parser.step();
            parser.expect_peek(TokenKind::LBrace)?;

            Some(BlockStatement::parse(parser, None)?)
        } else {
            None
        };

        Ok(Self {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }
}

impl Display for IfExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if{} {}", self.condition, self.consequence)?;

        if let Some(alternative) = &self.alternative {
            write!(f, "else {alternative}")?;
        }

        Ok(())
    }
}

// function -> fn ( [ <identifier> { , <identifier> } ] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl<T: Iterator<Item = Token>> Parse<T> for FunctionLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();

        parser.expect_peek(TokenKind::LParen)?;
        let parameters = parse_function_parameters(parser)?;

        parser.expect_peek(TokenKind::LBrace)?;
        let body = BlockStatement::parse(parser, None)?;

        Ok(Self { token, parameters, body })
    }
}

fn parse_function_parameters<T: Iterator<Item = Token>>(
    parser: &mut Parser<T>
) -> Result<Vec<Identifier>, ParseError> {
    let mut parameters = vec![];

    if parser.peek_is(TokenKind::RParen) {
        parser.step();
        return Ok(parameters);
    }

    parser.expect_peek(TokenKind::Ident)?;
    parameters.push(Identifier::from(parser.current_token.clone()));

    while parser.peek_is(TokenKind::Comma) {
        parser.step();
        parser.expect_peek(TokenKind::Ident)?;
        parameters.push(Identifier::from(parser.current_token.clone()));
    }

    parser.expect_peek(TokenKind::RParen)?;

    Ok(parameters)
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self.parameters.iter()
            .map(|parameter| parameter.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({}) {}", self.token.literal, parameters.join(", "), self.body)
    }
}

// call -> <expression> ( [ <expression> { , <expression> } ] )
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub token: Token,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl<T: Iterator<Item = Token>> InfixParse<T> for CallExpression {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();
        let mut arguments = vec![];

        if parser.peek_is(TokenKind::RParen) {
            parser.step();
        } else {
            parser.step();
            arguments.push(Expression::parse(parser, Some(Precedence::Lowest))?);

            while parser.peek_is(TokenKind::Comma) {
                parser.step();
                parser.step();
                arguments.push(Expression::parse(parser, Some(Precedence::Lowest))?);
            }

            parser.expect_peek(TokenKind::RParen)?;
        }

        Ok(Self {
            token,
            function: Box::new(left),
            arguments,
        })
    }
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({})", self.function, arguments.join(", "))
    }
}
