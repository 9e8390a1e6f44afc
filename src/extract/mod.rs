pub mod event;
pub mod parse;
pub mod stream;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, trace};

use self::event::Event;
use self::parse::{marker_pattern, parse_line, ParseError};

/// Line counters for a single extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Lines read from the source.
    pub lines: u64,
    /// Lines that produced an event.
    pub events: u64,
}

/// Scans text lines for one marker and yields (id, timestamp) events.
#[derive(Debug, Clone)]
pub struct LineExtractor {
    marker: String,
    pattern: Regex,
}

impl LineExtractor {
    /// Compile an extractor for the given marker token.
    pub fn new(marker: &str) -> Result<Self> {
        let pattern = marker_pattern(marker)
            .with_context(|| format!("compiling line pattern for marker {marker}"))?;

        Ok(Self {
            marker: marker.to_string(),
            pattern,
        })
    }

    /// Returns the marker token this extractor looks for.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Parse a single line.
    pub fn parse(&self, line: &str) -> Result<Event, ParseError> {
        parse_line(&self.pattern, line)
    }

    /// Lazily extract events from an iterator of lines.
    ///
    /// Lines without the marker are skipped. Repeated identifiers are
    /// yielded once per line.
    pub fn extract<'a, I>(&'a self, lines: I) -> impl Iterator<Item = Event> + 'a
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: 'a,
    {
        lines
            .into_iter()
            .filter_map(move |line| self.accept(line.as_ref()))
    }

    /// Consume a reader to the end, collecting every event.
    ///
    /// Invalid UTF-8 is decoded lossily; only I/O failures are errors.
    pub fn read<R: BufRead>(&self, mut reader: R) -> Result<(Vec<Event>, ExtractStats)> {
        let mut events = Vec::new();
        let mut stats = ExtractStats::default();
        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .context("reading log line")?;
            if n == 0 {
                break;
            }

            stats.lines += 1;

            let line = String::from_utf8_lossy(&buf);
            if let Some(event) = self.accept(&line) {
                stats.events += 1;
                events.push(event);
            }
        }

        Ok((events, stats))
    }

    fn accept(&self, line: &str) -> Option<Event> {
        match self.parse(line) {
            Ok(event) => Some(event),
            Err(ParseError::NoMatch) => None,
            Err(e) => {
                trace!(marker = %self.marker, error = %e, "skipping line");
                None
            }
        }
    }
}

/// Read every event for `extractor`'s marker from the file at `path`.
pub fn read_file(path: &Path, extractor: &LineExtractor) -> Result<Vec<Event>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let (events, stats) = extractor
        .read(BufReader::new(file))
        .with_context(|| format!("reading {}", path.display()))?;

    debug!(
        path = %path.display(),
        marker = extractor.marker(),
        lines = stats.lines,
        events = stats.events,
        "extracted events",
    );

    Ok(events)
}
