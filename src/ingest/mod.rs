//! Instrument-data ingestion pipelines.
//!
//! [`sheet`] pulls a published spreadsheet over HTTP with multi-endpoint,
//! multi-relay fallback; [`file`] parses a user-supplied CSV file by header
//! keywords. Both share the delimiter voting and cell mechanics here and
//! the tolerant numeric parser in [`crate::numeric`].

pub mod file;
pub mod sheet;

/// Recognized field delimiters, in tie-breaking precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    Semicolon,
}

impl Delimiter {
    pub const ALL: [Delimiter; 3] = [Delimiter::Comma, Delimiter::Tab, Delimiter::Semicolon];

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
        }
    }

    /// Picks the delimiter by character-frequency voting over `text`.
    ///
    /// Ties (including the all-zero case) resolve to the earliest entry in
    /// [`Delimiter::ALL`], so plain single-column text defaults to comma.
    pub fn detect(text: &str) -> Delimiter {
        let mut best = Delimiter::Comma;
        let mut best_count = 0usize;
        for candidate in Delimiter::ALL {
            let count = text.chars().filter(|c| *c == candidate.as_char()).count();
            if count > best_count {
                best = candidate;
                best_count = count;
            }
        }
        best
    }
}

/// Removes a leading UTF-8 byte-order marker if present.
pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Splits on any newline convention (`\r\n`, `\n`, bare `\r`).
///
/// Empty segments are kept; callers skip blank lines themselves.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r'])
}

/// Strips one layer of surrounding single or double quotes.
pub(crate) fn strip_quotes(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim_matches('\'').trim()
}
