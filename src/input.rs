//! Answer input boundary.
//!
//! Reading and parsing are kept apart from scoring: the drill only ever sees
//! an accepted number, and tests swap stdin for a [`ScriptedSource`].

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::{DrillError, Result};

pub const ANSWER_PROMPT: &str = "Your answer: ";
pub const INVALID_ANSWER: &str = "Invalid input. Please enter a numerical value.";

/// Where answer lines come from
pub trait LineSource {
    /// Next line without its terminator, or `None` once input is exhausted.
    fn read_line(&mut self) -> std::io::Result<Option<String>>;
}

/// Line source over any buffered reader (stdin in production)
pub struct ReaderSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed_len = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed_len);
        Ok(Some(buf))
    }
}

/// Pre-recorded answers for tests
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Parse a numeric answer; rejects `nan` and infinities.
pub fn parse_answer(line: &str) -> Option<f64> {
    line.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Prompt until a parseable number arrives.
///
/// Bad lines are reported and retried without limit. Only a closed input
/// stream ends the loop without a number.
pub fn read_number<S, W>(source: &mut S, out: &mut W) -> Result<f64>
where
    S: LineSource + ?Sized,
    W: Write + ?Sized,
{
    loop {
        write!(out, "{ANSWER_PROMPT}")?;
        out.flush()?;

        let line = source.read_line()?.ok_or(DrillError::InputClosed)?;
        match parse_answer(&line) {
            Some(value) => return Ok(value),
            None => {
                tracing::debug!(input = %line, "rejected non-numeric answer");
                writeln!(out, "{INVALID_ANSWER}")?;
            }
        }
    }
}

/// Ask a yes/no question; only a trimmed, case-insensitive `yes` counts.
pub fn read_confirmation<S, W>(source: &mut S, out: &mut W, question: &str) -> Result<bool>
where
    S: LineSource + ?Sized,
    W: Write + ?Sized,
{
    write!(out, "{question}")?;
    out.flush()?;

    let line = source.read_line()?.ok_or(DrillError::InputClosed)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}
