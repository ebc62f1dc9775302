//! Tolerant numeric parsing for user-entered and imported values.
//!
//! Spreadsheet exports and hand-edited CSV files carry prices in many
//! shapes (`"$1,234.50"`, `"1234.50"`, `" 12,5 "` does not occur — comma is
//! thousands only). Both ingestion pipelines funnel every numeric cell
//! through [`parse_loose`] so the same text always yields the same float.

/// Currency symbols stripped before parsing.
const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

/// Parses a string into an `f64`, tolerating common formatting noise.
///
/// Strips currency symbols, thousands commas, surrounding single or double
/// quotes, and whitespace. Returns `0.0` when the input is empty, not a
/// number, or parses to a non-finite value. Never panics.
pub fn parse_loose(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .trim_matches('"')
        .trim_matches('\'')
        .trim();

    let cleaned: String = unquoted
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',')
        .collect();

    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
