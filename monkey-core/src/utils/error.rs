use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::error::RuntimeError,
    lexer::prelude::TokenKind,
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan,
};
use super::diagnostic::{Diagnostic, Label, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        errors: Vec<ParseError>
    },
    #[error("{error}")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();

        // Writes into an in-memory buffer cannot fail.
        let _ = self.pretty(&mut nocolor);

        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) -> std::io::Result<()> {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf)?;
            writeln!(buf)?;
        }

        Ok(())
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, errors } => errors
                .iter()
                .map(|error| {
                    let (label, extra) = error.details();

                    let span = match error.error {
                        ParseErrorType::UnexpectedToken { got: TokenKind::Eof, .. } => SrcSpan {
                            start: src.len() as u32,
                            end: src.len() as u32,
                        },
                        _ => error.span,
                    };

                    Diagnostic {
                        title: error.to_string(),
                        text: extra.join("\n"),
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            label: Label {
                                text: Some(label.to_string()),
                                span,
                            },
                        }),
                    }
                })
                .collect(),
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();

                vec![Diagnostic {
                    title: error.to_string(),
                    text: extra.join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.span,
                        },
                    }),
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    location: None,
                }]
            }
        }
    }
}
