//! Output sink for CLI commands
//!
//! Every user-facing message goes through [`Output`], so tests can swap
//! stdout for an in-memory buffer.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    sink: RefCell<Box<dyn Write>>,
    format: Cell<OutputFormat>,
}

impl Output {
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self {
            sink: RefCell::new(sink),
            format: Cell::new(OutputFormat::Text),
        }
    }

    /// Writes to the process stdout
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn set_format(&self, format: OutputFormat) {
        self.format.set(format);
    }

    pub fn format(&self) -> OutputFormat {
        self.format.get()
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format.get() == OutputFormat::Json
    }

    /// Prints a line
    pub fn line(&self, message: impl Display) -> io::Result<()> {
        writeln!(self.sink.borrow_mut(), "{}", message)
    }

    /// Prints a blank line
    pub fn blank(&self) -> io::Result<()> {
        writeln!(self.sink.borrow_mut())
    }

    /// Prints a prompt without a trailing newline
    pub fn prompt(&self, message: &str) -> io::Result<()> {
        let mut sink = self.sink.borrow_mut();
        write!(sink, "{}", message)?;
        sink.flush()
    }

    /// Prints pre-rendered text as is
    pub fn raw(&self, text: &str) -> io::Result<()> {
        let mut sink = self.sink.borrow_mut();
        sink.write_all(text.as_bytes())?;
        sink.flush()
    }

    /// Prints a success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        match self.format.get() {
            OutputFormat::Text => self.line(message),
            OutputFormat::Json => self.line(serde_json::json!({
                "success": true,
                "message": message
            })),
        }
    }

    /// Prints structured data as JSON
    pub fn data<T: Serialize>(&self, data: &T) -> io::Result<()> {
        let json = match self.format.get() {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        }
        .map_err(io::Error::other)?;
        self.line(json)
    }

    /// Prints an aligned table (text format)
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let render = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        self.line(render(headers.to_vec()))?;
        self.line(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        )?;
        for row in rows {
            self.line(render(row.iter().map(String::as_str).collect()))?;
        }
        Ok(())
    }
}
