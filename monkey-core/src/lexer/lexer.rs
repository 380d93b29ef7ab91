use std::fmt::Display;

use super::token::{str_to_keyword, Token, TokenKind};
use crate::utils::prelude::SrcSpan;

pub type SourceChars<'a> = std::iter::Map<std::str::CharIndices<'a>, fn((usize, char)) -> (u32, char)>;

fn widen_offset((offset, ch): (usize, char)) -> (u32, char) {
	(offset as u32, ch)
}

/// Adapts a source string into the `(offset, char)` stream the lexer consumes.
pub fn source_chars(src: &str) -> SourceChars<'_> {
	src.char_indices().map(widen_offset as fn((usize, char)) -> (u32, char))
}

fn is_letter(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_'
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

impl<'a> Lexer<SourceChars<'a>> {
	pub fn from_source(src: &'a str) -> Self {
		Self::new(source_chars(src))
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		let mut lexer = Self {
			position: 0,
			next_position: 0,
			ch: None,
			next_ch: None,
			input,
			finished: false,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	/// Returns the next token. Once the input is exhausted every call
	/// yields an `Eof` token with an empty literal.
	pub fn next_token(&mut self) -> Token {
		self.skip_whitespace();

		match self.ch {
			Some(ch) => match ch {
				'=' => self.eat_one_or_two('=', TokenKind::Equal, TokenKind::Assign),
				'!' => self.eat_one_or_two('=', TokenKind::NotEqual, TokenKind::Bang),
				'+' => self.eat_one_char(TokenKind::Plus),
				'-' => self.eat_one_char(TokenKind::Minus),
				'*' => self.eat_one_char(TokenKind::Asterisk),
				'/' => self.eat_one_char(TokenKind::Slash),
				'<' => self.eat_one_char(TokenKind::LessThan),
				'>' => self.eat_one_char(TokenKind::GreaterThan),
				',' => self.eat_one_char(TokenKind::Comma),
				';' => self.eat_one_char(TokenKind::Semicolon),
				'(' => self.eat_one_char(TokenKind::LParen),
				')' => self.eat_one_char(TokenKind::RParen),
				'{' => self.eat_one_char(TokenKind::LBrace),
				'}' => self.eat_one_char(TokenKind::RBrace),
				c if is_letter(c) => self.lex_ident(),
				c if c.is_ascii_digit() => self.lex_number(),
				_ => self.eat_one_char(TokenKind::Illegal),
			},
			None => Token::eof(self.position),
		}
	}

	pub fn peek_char(&self) -> Option<char> {
		self.next_ch
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position = self.position + self.next_ch.map_or(0, |ch| ch.len_utf8() as u32);

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	fn skip_whitespace(&mut self) {
		while let Some(' ' | '\t' | '\n' | '\r') = self.ch {
			self.next_char();
		}
	}

	fn eat_one_char(&mut self, kind: TokenKind) -> Token {
		let start = self.position;
		let literal = self.next_char()
			.map(String::from)
			.unwrap_or_default();

		Token::new(kind, literal, SrcSpan::from(start, self.position))
	}

	fn eat_one_or_two(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
		if self.peek_char() != Some(second) {
			return self.eat_one_char(single);
		}

		let start = self.position;
		let mut literal = String::with_capacity(2);

		literal.extend(self.next_char());
		literal.extend(self.next_char());

		Token::new(double, literal, SrcSpan::from(start, self.position))
	}

	fn lex_ident(&mut self) -> Token {
		let start = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch.filter(|ch| is_letter(*ch)) {
			ident.push(ch);
			self.next_char();
		}

		let kind = str_to_keyword(&ident).unwrap_or(TokenKind::Ident);

		Token::new(kind, ident, SrcSpan::from(start, self.position))
	}

	fn lex_number(&mut self) -> Token {
		let start = self.position;
		let mut value = String::new();

		while let Some(ch) = self.ch.filter(char::is_ascii_digit) {
			value.push(ch);
			self.next_char();
		}

		Token::new(TokenKind::Int, value, SrcSpan::from(start, self.position))
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = Token;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();
		self.finished = token.is(TokenKind::Eof);

		Some(token)
	}
}
