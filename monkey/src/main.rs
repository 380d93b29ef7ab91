mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use cli::{print_finished, print_parsing, print_running};
use monkey_core::{session::{parse_file, Session}, utils::prelude::Error};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
enum Command {
    /// Runs Read Eval Print Loop
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
    /// Evaluates a source file and prints the value of its last statement
    Run {
        /// Path of source file
        path: PathBuf,
    },
    /// Parses a source file and prints it back in canonical form
    Parse {
        /// Path of source file
        path: PathBuf,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let command = Command::parse();

    if matches!(command, Command::Repl | Command::Rlpl | Command::Rppl) {
        if let Err(err) = ctrlc::set_handler(|| {
            println!();
            std::process::exit(0);
        }) {
            warn!(%err, "could not install Ctrl-C handler");
        }
    }

    let result = match command {
        Command::Repl => interactive(repl::start()),
        Command::Rlpl => interactive(rlpl::start()),
        Command::Rppl => interactive(rppl::start()),
        Command::Run { path } => {
            print_running(&path.display().to_string());
            let start = std::time::Instant::now();

            let result = Session::new()
                .run_file(&path)
                .map(|value| {
                    if let Some(value) = value {
                        println!("{value}");
                    }
                });

            print_finished(start.elapsed());
            result
        },
        Command::Parse { path, print_ast } => {
            print_parsing(&path.display().to_string());
            let start = std::time::Instant::now();

            let result = parse_file(&path)
                .map(|program| {
                    if print_ast {
                        println!("{program:#?}");
                    } else {
                        println!("{program}");
                    }
                });

            print_finished(start.elapsed());
            result
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn interactive(result: std::io::Result<()>) -> Result<(), Error> {
    debug!("interactive loop finished");
    result.map_err(|err| Error::StdIo { err: err.kind() })
}

fn report(err: &Error) {
    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    if let Err(io_err) = err.pretty(&mut buf).and_then(|_| buf_writer.print(&buf)) {
        eprintln!("{err}: {io_err}");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MONKEY_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
