//! Line parsing for metric log lines.
//!
//! A metric line carries a marker token followed by two unsigned integers
//! (identifier, timestamp in milliseconds). Any run of non-digit characters
//! may separate the marker from the first integer and the two integers from
//! each other, so both `METRIC_CAM_SEND 7 1200` and
//! `[ldm] METRIC_DENM_RCV id=7, t=1200` parse to the same event.

use regex::Regex;
use thiserror::Error;

use super::event::Event;

/// Reasons a line does not yield an event.
///
/// None of these are fatal: the extractor skips the line and moves on.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("marker followed by two integers not found")]
    NoMatch,

    #[error("identifier {raw} does not fit in 64 bits")]
    IdOutOfRange { raw: String },

    #[error("timestamp {raw} does not fit in a signed 64-bit value")]
    TimestampOutOfRange { raw: String },
}

/// Build the line pattern for a marker token.
///
/// The marker is matched literally. Digits are ASCII only so every captured
/// field is accepted by the integer parsers below.
pub fn marker_pattern(marker: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "{}[^0-9]+([0-9]+)[^0-9]+([0-9]+)",
        regex::escape(marker)
    ))
}

/// Parse one line against a compiled marker pattern.
///
/// The first occurrence of the pattern in the line wins.
pub fn parse_line(pattern: &Regex, line: &str) -> Result<Event, ParseError> {
    let caps = pattern.captures(line).ok_or(ParseError::NoMatch)?;

    let raw_id = caps.get(1).ok_or(ParseError::NoMatch)?.as_str();
    let raw_ts = caps.get(2).ok_or(ParseError::NoMatch)?.as_str();

    let id = raw_id.parse::<u64>().map_err(|_| ParseError::IdOutOfRange {
        raw: raw_id.to_string(),
    })?;
    let timestamp_ms = raw_ts
        .parse::<i64>()
        .map_err(|_| ParseError::TimestampOutOfRange {
            raw: raw_ts.to_string(),
        })?;

    Ok(Event::new(id, timestamp_ms))
}
