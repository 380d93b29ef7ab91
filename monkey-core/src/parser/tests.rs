use pretty_assertions::assert_eq;

use crate::{
    lexer::prelude::{Lexer, Token, TokenKind},
    parser::prelude::{
        parse_integer, parse_module, parse_module_from_stream, Expression, Identifier,
        LetStatement, ParseError, ParseErrorType, Parser, Program, Statement
    },
    utils::prelude::SrcSpan,
};

fn parse(input: &str) -> Program {
    match parse_module(input) {
        Ok(program) => program,
        Err(errors) => panic!(
            "parser had {} error(s) for {input:?}:\n{}",
            errors.len(),
            errors.iter().map(|err| format!("\t{err}")).collect::<Vec<_>>().join("\n")
        ),
    }
}

fn parse_errors(input: &str) -> Vec<String> {
    let mut parser = Parser::new(Lexer::from_source(input));
    parser.parse_program();

    parser.errors()
        .iter()
        .map(ParseError::to_string)
        .collect()
}

#[test]
fn test_let_statements() {
    let program = parse("let x = 5;\nlet y = true;\nlet foobar = y;");

    assert_eq!(program.statements.len(), 3);

    let cases = [("x", "5"), ("y", "true"), ("foobar", "y")];

    for (statement, (name, value)) in program.statements.iter().zip(cases) {
        let Statement::Let(LetStatement { token, name: ident, value: expr }) = statement else {
            panic!("expected let statement, got {statement:?}");
        };

        assert_eq!(token.literal, "let");
        assert_eq!(ident.value, name);
        assert_eq!(ident.token.literal, name);
        assert_eq!(expr.to_string(), value);
    }
}

#[test]
fn test_let_round_trip() {
    let cases = [
        ("let x = 5;", "let x = 5;"),
        ("let x = a + b * c", "let x = (a + (b * c));"),
        ("let f = fn(a, b) { a * b };", "let f = fn(a, b) (a * b);"),
        ("let y = if (x) { 1 } else { 2 };", "let y = ifx 1else 2;"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).to_string(), expected, "{input}");
    }
}

#[test]
fn test_return_statements() {
    let program = parse("return 5;\nreturn 10;\nreturn add(15);\nreturn;");

    let rendered = program.statements.iter()
        .map(|statement| {
            assert_eq!(statement.token_literal(), "return");
            statement.to_string()
        })
        .collect::<Vec<String>>();

    assert_eq!(rendered, vec!["return 5;", "return 10;", "return add(15);", "return;"]);
}

#[test]
fn test_identifier_expression() {
    let program = parse("foobar;");

    assert_eq!(program.statements.len(), 1);

    let Statement::Expression(statement) = &program.statements[0] else {
        panic!("expected expression statement");
    };

    let Expression::Identifier(ident) = &statement.expression else {
        panic!("expected identifier, got {:?}", statement.expression);
    };

    assert_eq!(ident.value, "foobar");
    assert_eq!(ident.token.literal, "foobar");
}

#[test]
fn test_integer_and_boolean_literals() {
    let program = parse("5; true; false; 010;");

    let literals = program.statements.iter()
        .map(|statement| match statement {
            Statement::Expression(statement) => match &statement.expression {
                Expression::Integer(integer) => integer.value.to_string(),
                Expression::Boolean(boolean) => boolean.value.to_string(),
                other => panic!("unexpected expression {other:?}"),
            },
            other => panic!("unexpected statement {other:?}"),
        })
        .collect::<Vec<String>>();

    assert_eq!(literals, vec!["5", "true", "false", "8"]);
}

#[test]
fn test_prefix_expressions() {
    let cases = [
        ("!5;", "(!5)"),
        ("-15;", "(-15)"),
        ("!true;", "(!true)"),
        ("!false;", "(!false)"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).to_string(), expected, "{input}");
    }
}

#[test]
fn test_infix_expressions() {
    let operators = ["+", "-", "*", "/", ">", "<", "==", "!="];

    for operator in operators {
        let input = format!("5 {operator} 5;");
        let program = parse(&input);

        let Statement::Expression(statement) = &program.statements[0] else {
            panic!("expected expression statement");
        };

        let Expression::Infix(infix) = &statement.expression else {
            panic!("expected infix expression for {input}");
        };

        assert_eq!(infix.operator, operator);
        assert_eq!(infix.left.to_string(), "5");
        assert_eq!(infix.right.to_string(), "5");
    }
}

#[test]
fn test_operator_precedence() {
    let cases = [
        ("1 + 2 * 3;", "(1 + (2 * 3))"),
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ("true", "true"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("3 < 5 == true", "((3 < 5) == true)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        ("add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))", "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))"),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).to_string(), expected, "{input}");
    }
}

#[test]
fn test_if_expression() {
    let program = parse("if (x < y) { x }");

    let Statement::Expression(statement) = &program.statements[0] else {
        panic!("expected expression statement");
    };

    let Expression::If(if_) = &statement.expression else {
        panic!("expected if expression");
    };

    assert_eq!(if_.condition.to_string(), "(x < y)");
    assert_eq!(if_.consequence.statements.len(), 1);
    assert_eq!(if_.consequence.to_string(), "x");
    assert!(if_.alternative.is_none());
}

#[test]
fn test_if_else_expression() {
    let program = parse("if (x < y) { x } else { y; z }");

    assert_eq!(program.to_string(), "if(x < y) xelse yz");
}

#[test]
fn test_function_literal() {
    let program = parse("fn(x, y) { x + y; }");

    let Statement::Expression(statement) = &program.statements[0] else {
        panic!("expected expression statement");
    };

    let Expression::Function(function) = &statement.expression else {
        panic!("expected function literal");
    };

    let parameters = function.parameters.iter()
        .map(|parameter| parameter.value.as_str())
        .collect::<Vec<&str>>();

    assert_eq!(parameters, vec!["x", "y"]);
    assert_eq!(function.body.to_string(), "(x + y)");
    assert_eq!(program.to_string(), "fn(x, y) (x + y)");
}

#[test]
fn test_function_parameters() {
    let cases = [
        ("fn() {};", vec![]),
        ("fn(x) {};", vec!["x"]),
        ("fn(x, y, z) {};", vec!["x", "y", "z"]),
    ];

    for (input, expected) in cases {
        let program = parse(input);

        let Statement::Expression(statement) = &program.statements[0] else {
            panic!("expected expression statement");
        };

        let Expression::Function(function) = &statement.expression else {
            panic!("expected function literal");
        };

        let parameters = function.parameters.iter()
            .map(|parameter| parameter.value.as_str())
            .collect::<Vec<&str>>();

        assert_eq!(parameters, expected, "{input}");
    }
}

#[test]
fn test_call_expression() {
    let program = parse("add(1, 2 * 3, 4 + 5);");

    let Statement::Expression(statement) = &program.statements[0] else {
        panic!("expected expression statement");
    };

    let Expression::Call(call) = &statement.expression else {
        panic!("expected call expression");
    };

    assert_eq!(call.function.to_string(), "add");

    let arguments = call.arguments.iter()
        .map(Expression::to_string)
        .collect::<Vec<String>>();

    assert_eq!(arguments, vec!["1", "(2 * 3)", "(4 + 5)"]);
    assert_eq!(parse("add();").to_string(), "add()");
    assert_eq!(parse("fn(x) { x }(5)").to_string(), "fn(x) x(5)");
}

#[test]
fn test_program_string() {
    let name = Token::new(TokenKind::Ident, "myVar", SrcSpan::from(4, 9));
    let value = Token::new(TokenKind::Ident, "anotherVar", SrcSpan::from(12, 22));

    let program = Program {
        statements: vec![Statement::Let(LetStatement {
            token: Token::new(TokenKind::Let, "let", SrcSpan::from(0, 3)),
            name: Identifier::from(name),
            value: Expression::Identifier(Identifier::from(value)),
        })],
    };

    assert_eq!(program.to_string(), "let myVar = anotherVar;");
    assert_eq!(program.token_literal(), "let");
    assert_eq!(Program::default().token_literal(), "");
}

#[test]
fn test_let_errors() {
    assert_eq!(
        parse_errors("let x 5;\nlet = 10;\nlet 838383;"),
        vec![
            "expected next token to be =, got INT instead",
            "expected next token to be IDENTIFIER, got = instead",
            "no prefix parse function for = found",
            "expected next token to be IDENTIFIER, got INT instead",
        ]
    );
}

#[test]
fn test_error_messages() {
    let cases = [
        ("}", "no prefix parse function for } found"),
        ("(1 + 2", "expected next token to be ), got EOF instead"),
        ("if (x) { 1", "expected next token to be }, got EOF instead"),
        ("if x { 1 }", "expected next token to be (, got IDENTIFIER instead"),
        ("fn(1) { }", "expected next token to be IDENTIFIER, got INT instead"),
        ("fn(x y) { }", "expected next token to be ), got IDENTIFIER instead"),
        ("add(1, 2", "expected next token to be ), got EOF instead"),
        ("99999999999999999999", r#"could not parse "99999999999999999999" as integer"#),
        ("09", r#"could not parse "09" as integer"#),
    ];

    for (input, expected) in cases {
        let errors = parse_errors(input);

        assert_eq!(errors.first().map(String::as_str), Some(expected), "{input}");
    }
}

#[test]
fn test_errors_inside_blocks_are_recovered() {
    let errors = parse_errors("fn(x) { let = 1; x }; let y = 2;");

    assert_eq!(
        errors,
        vec![
            "expected next token to be IDENTIFIER, got = instead",
            "no prefix parse function for = found",
        ]
    );
}

#[test]
fn test_let_without_semicolon_at_eof() {
    let program = parse("let a = 1");

    assert_eq!(program.to_string(), "let a = 1;");
}

#[test]
fn test_statement_end_before_closing_brace() {
    assert_eq!(parse("fn() { return 1 }").to_string(), "fn() return 1;");
    assert_eq!(parse("fn() { return }").to_string(), "fn() return;");
    assert_eq!(parse("fn() { let a = 2 }; 3").to_string(), "fn() let a = 2;3");
    assert_eq!(parse("let a = 1 2 3; a").to_string(), "let a = 1;a");
}

#[test]
fn test_error_spans() {
    let input = "let x 5;";
    let errors = parse_module(input).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].error,
        ParseErrorType::UnexpectedToken { expected: TokenKind::Assign, got: TokenKind::Int }
    );
    assert_eq!(&input[errors[0].span.as_range()], "5");
}

#[test]
fn test_parse_from_stream() {
    let program = parse_module_from_stream("let é = 1;".chars());

    assert!(program.is_err());

    let program = parse_module_from_stream("let add = fn(a, b) { a + b };".chars()).unwrap();

    assert_eq!(program.to_string(), "let add = fn(a, b) (a + b);");
}

#[test]
fn test_parse_integer() {
    assert_eq!(parse_integer("0"), Some(0));
    assert_eq!(parse_integer("42"), Some(42));
    assert_eq!(parse_integer("010"), Some(8));
    assert_eq!(parse_integer("0x1f"), Some(31));
    assert_eq!(parse_integer("0X1F"), Some(31));
    assert_eq!(parse_integer("0o17"), Some(15));
    assert_eq!(parse_integer("0b101"), Some(5));
    assert_eq!(parse_integer("9223372036854775807"), Some(i64::MAX));
    assert_eq!(parse_integer("9223372036854775808"), None);
    assert_eq!(parse_integer("08"), None);
    assert_eq!(parse_integer("0x"), None);
    assert_eq!(parse_integer(""), None);
}
