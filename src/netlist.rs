//! Physical-to-logical line scanning for SPICE model libraries.
//!
//! A line whose first non-blank character is `+` continues the previous
//! logical line: the marker is stripped and the rest appended verbatim.
//! Each logical line is tagged with the 1-based number of the physical line
//! it started on.
//!
//! [`SubcircuitFilter`] layers `.SUBCKT`/`.ENDS` suppression on top. It only
//! tracks one level: a nested `.SUBCKT` does not deepen the block, so the
//! first `.ENDS` ends suppression even if an outer block is still open.

use std::io::{self, BufRead};

use crate::error::Warning;

/// One joined line and the physical line number it began on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    pub line: usize,
}

/// Lazily joins continuation lines from a source of physical lines.
pub struct LogicalLines<I> {
    physical: I,
    line_num: usize,
    pending: Option<LogicalLine>,
    done: bool,
}

impl<I> LogicalLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(physical: I) -> Self {
        Self {
            physical,
            line_num: 0,
            pending: None,
            done: false,
        }
    }
}

impl<I> Iterator for LogicalLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let raw = match self.physical.next() {
                Some(Ok(raw)) => raw,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return self.pending.take().map(Ok);
                }
            };
            self.line_num += 1;
            let text = raw.trim_end_matches(['\r', '\n']);

            if let Some(content) = continuation(text) {
                match self.pending.as_mut() {
                    Some(pending) => pending.text.push_str(content),
                    None => {
                        let warning = Warning::OrphanContinuation {
                            line: self.line_num,
                        };
                        tracing::warn!("{warning}");
                    }
                }
                continue;
            }

            let started = LogicalLine {
                text: text.to_string(),
                line: self.line_num,
            };
            if let Some(flushed) = self.pending.replace(started) {
                return Some(Ok(flushed));
            }
        }
    }
}

/// Content after the `+` marker, if this physical line is a continuation.
fn continuation(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix('+')
}

/// Physical lines from an open reader.
pub fn scan_reader<R: BufRead>(reader: R) -> LogicalLines<io::Lines<R>> {
    LogicalLines::new(reader.lines())
}

/// Physical lines from memory. Trailing line terminators are allowed.
pub fn scan_lines<L, S>(lines: L) -> LogicalLines<InMemory<L::IntoIter>>
where
    L: IntoIterator<Item = S>,
    S: Into<String>,
{
    LogicalLines::new(InMemory(lines.into_iter()))
}

/// Adapts infallible in-memory lines to the reader item type.
pub struct InMemory<I>(I);

impl<I, S> Iterator for InMemory<I>
where
    I: Iterator<Item = S>,
    S: Into<String>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|s| Ok(s.into()))
    }
}

// ---------------------------------------------------------------------------
// Subcircuit suppression
// ---------------------------------------------------------------------------

/// Drops every logical line from `.SUBCKT` through the next `.ENDS`, inclusive.
pub struct SubcircuitFilter<I> {
    inner: I,
    inside: bool,
}

impl<I> SubcircuitFilter<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            inside: false,
        }
    }
}

impl<I> Iterator for SubcircuitFilter<I>
where
    I: Iterator<Item = io::Result<LogicalLine>>,
{
    type Item = io::Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.inner.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            if is_directive(&line.text, ".SUBCKT") {
                tracing::debug!(line = line.line, "entering subcircuit");
                self.inside = true;
                continue;
            }
            if is_directive(&line.text, ".ENDS") {
                self.inside = false;
                continue;
            }
            if !self.inside {
                return Some(Ok(line));
            }
        }
    }
}

/// True if the first word of `line` is `directive`, ignoring case.
fn is_directive(line: &str, directive: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case(directive))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
