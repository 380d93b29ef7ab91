use monkey_core::{lexer::prelude::Lexer, parser::prelude::Parser};

use crate::cli::read_line;

pub fn start() -> std::io::Result<()> {
	while let Some(input) = read_line()? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let mut parser = Parser::new(Lexer::from_source(&input));
				let program = parser.parse_program();

				if parser.errors().is_empty() {
					println!("{program}");
				} else {
					print_parser_errors(parser.errors());
				}
			}
		}
	}

	Ok(())
}

pub fn print_parser_errors(errors: &[monkey_core::parser::prelude::ParseError]) {
	println!("parser errors:");

	for error in errors {
		println!("\t{error}");
	}
}
