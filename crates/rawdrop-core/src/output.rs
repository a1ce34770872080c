//! Status-line output for job outcomes.
//!
//! Text format prints one human-readable line per outcome:
//!
//! ```text
//! /photos/a.nef SAVED(/photos/a.jpg)
//! /photos/b.nef SKIPPED(/photos/b.jpg, reason=exists)
//! /photos/c.nef FAILED(decode, ...)
//! ```
//!
//! JSON Lines format writes one serialized object per line instead.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{JobOutcome, WatchSummary};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable status lines
    #[default]
    Text,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Writes outcomes and summaries in the selected format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    /// Write one outcome and flush, so lines appear as jobs finish.
    pub fn write_outcome(&mut self, outcome: &JobOutcome) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.writer, "{} {}", outcome.source().display(), outcome)?;
            }
            OutputFormat::JsonLines => self.write_json(outcome)?,
        }
        self.writer.flush()
    }

    /// Write the end-of-run summary.
    pub fn write_summary(&mut self, summary: &WatchSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(
                self.writer,
                "{} cycle(s): {} saved, {} skipped, {} failed",
                summary.cycles, summary.saved, summary.skipped, summary.failed
            )?,
            OutputFormat::JsonLines => self.write_json(summary)?,
        }
        self.writer.flush()
    }

    fn write_json<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        writeln!(self.writer)
    }
}
