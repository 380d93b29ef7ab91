use monkey_core::{session::Session, utils::prelude::Error};

use crate::{cli::read_line, rppl::print_parser_errors};

/// Read-eval-print loop over a single session, so bindings made on one line
/// stay visible on the next.
pub fn start() -> std::io::Result<()> {
	let session = Session::new();

	while let Some(input) = read_line()? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => match session.eval(&input) {
				Ok(Some(value)) => println!("{value}"),
				Ok(None) => {},
				Err(Error::Parse { errors, .. }) => print_parser_errors(&errors),
				Err(Error::Runtime { error, .. }) => println!("ERROR: {error}"),
				Err(err) => println!("ERROR: {err}"),
			}
		}
	}

	Ok(())
}
