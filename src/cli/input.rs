//! Interactive input for commands that prompt the user

use std::io::{self, BufRead};

/// Source of interactive input
pub trait Input {
    /// Reads one line, without its line terminator
    fn read_line(&mut self) -> io::Result<String>;

    /// Reads a secret without echoing it
    fn read_password(&mut self) -> io::Result<String>;
}

/// Reads from the process stdin and the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalInput;

impl Input for TerminalInput {
    fn read_line(&mut self) -> io::Result<String> {
        read_line_from(&mut io::stdin().lock())
    }

    fn read_password(&mut self) -> io::Result<String> {
        rpassword::read_password()
    }
}

/// Reads both lines and passwords from an in-memory or piped reader
pub struct BufferedInput<R> {
    reader: R,
}

impl<R: BufRead> BufferedInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Input for BufferedInput<R> {
    fn read_line(&mut self) -> io::Result<String> {
        read_line_from(&mut self.reader)
    }

    fn read_password(&mut self) -> io::Result<String> {
        read_line_from(&mut self.reader)
    }
}

fn read_line_from(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(strip_line_terminator(&line).to_string())
}

/// Strips exactly one trailing `\n` or `\r\n`
pub fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}
