use std::{cell::RefCell, path::{Path, PathBuf}, rc::Rc};

use tracing::debug;
use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::{Environment, Value},
    eval::eval,
    parser::prelude::{parse_module, parse_module_from_stream, Program},
    utils::prelude::Error,
};

/// Long-lived evaluation context. Every unit of source evaluated through the
/// same session sees the bindings left behind by the previous ones.
#[derive(Debug, Default)]
pub struct Session {
    env: Rc<RefCell<Environment>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(&self) -> &Rc<RefCell<Environment>> {
        &self.env
    }

    /// Parses and evaluates one unit of source. Nothing is evaluated when the
    /// parser reported errors.
    pub fn eval(&self, src: &str) -> Result<Option<Value>, Error> {
        self.eval_named(PathBuf::from("<input>"), src)
    }

    pub fn eval_named(&self, path: PathBuf, src: &str) -> Result<Option<Value>, Error> {
        let program = match parse_module(src) {
            Ok(program) => program,
            Err(errors) => {
                return Err(Error::Parse { path, src: src.to_string(), errors })
            }
        };

        self.eval_program(path, src.to_string(), &program)
    }

    /// Evaluates a source file as one unit.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<Option<Value>, Error> {
        let path = path.as_ref().to_path_buf();
        let (src, program) = parse_source_file(&path)?;

        self.eval_program(path, src, &program)
    }

    fn eval_program(&self, path: PathBuf, src: String, program: &Program) -> Result<Option<Value>, Error> {
        eval(program, &self.env)
            .map_err(|error| Error::Runtime { path, src, error })
    }
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Program, Error> {
    parse_source_file(path.as_ref()).map(|(_, program)| program)
}

/// Parses a file while decoding it as a character stream, keeping a copy of
/// the text for diagnostics.
fn parse_source_file(path: &Path) -> Result<(String, Program), Error> {
    let file = std::fs::File::open(path)
        .map_err(|err| Error::StdIo { err: err.kind() })?;

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

    debug!(path = %path.display(), file_size, "reading source");

    let mut src = String::with_capacity(file_size);
    let mut io_error = None;
    let mut reader = std::io::BufReader::new(file);

    let stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                io_error = Some(err);
                None
            }
        });

    let parsed = parse_module_from_stream(stream);

    if let Some(err) = io_error {
        return Err(Error::StdIo { err: err.kind() });
    }

    match parsed {
        Ok(program) => Ok((src, program)),
        Err(errors) => Err(Error::Parse { path: path.to_path_buf(), src, errors }),
    }
}
