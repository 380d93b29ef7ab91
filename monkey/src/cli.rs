use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub(crate) const PROMPT: &str = ">> ";

pub(crate) fn print_running(text: &str) {
    print_colourful_prefix("Running", Color::Green, text)
}

pub(crate) fn print_parsing(text: &str) {
    print_colourful_prefix("Parsing", Color::Magenta, text)
}

pub(crate) fn print_finished(duration: Duration) {
    print_colourful_prefix("Finished", Color::Green, &format!("in {}", seconds(duration)))
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    if let Err(err) = write_colourful_prefix(prefix, color, text) {
        tracing::warn!(%err, "failed to write status line");
    }
}

fn write_colourful_prefix(prefix: &str, color: Color, text: &str) -> std::io::Result<()> {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();
    buffer.set_color(
        ColorSpec::new()
            .set_intense(true)
            .set_bold(true)
            .set_fg(Some(color)),
    )?;
    write!(buffer, "{prefix: >11}")?;
    buffer.set_color(&ColorSpec::new())?;
    writeln!(buffer, " {text}")?;
    buffer_writer.print(&buffer)
}

/// Prints the prompt and reads one line with the line ending stripped.
/// Returns `None` once stdin is closed.
pub(crate) fn read_line() -> std::io::Result<Option<String>> {
    let mut input = String::new();

    print!("{PROMPT}");
    std::io::stdout().flush()?;

    if std::io::stdin().read_line(&mut input)? == 0 {
        println!();
        return Ok(None);
    }

    if let Some('\n') = input.chars().next_back() {
        input.pop();
    }
    if let Some('\r') = input.chars().next_back() {
        input.pop();
    }

    Ok(Some(input))
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    if let Ok(force) = std::env::var("FORCE_COLOR") {
        !force.is_empty()
    } else {
        false
    }
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
