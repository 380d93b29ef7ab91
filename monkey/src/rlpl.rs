use monkey_core::lexer::prelude::{Lexer, TokenKind};

use crate::cli::read_line;

pub fn start() -> std::io::Result<()> {
	while let Some(input) = read_line()? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				for token in Lexer::from_source(&input) {
					if token.is(TokenKind::Eof) {
						break;
					}

					println!("{token}");
				}
			}
		}
	}

	Ok(())
}
