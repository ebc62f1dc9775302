//! Local CSV file ingestion.
//!
//! Unlike the sheet path, user files arrive with arbitrary column order,
//! so fields are located by header keywords rather than position. This is
//! the documented fallback when the remote pipeline is blocked by network
//! or consent restrictions: a successful import clears the configured
//! sheet URL and returns the repository to writable mode.

use std::fmt;

use crate::ingest::{Delimiter, split_lines, strip_bom, strip_quotes};
use crate::models::Instrument;
use crate::numeric::parse_loose;

/// Field-to-column-index mapping derived from the header line.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    symbol: Option<usize>,
    tick_size: Option<usize>,
    tick_value: Option<usize>,
    tick_per_point: Option<usize>,
    point_value: Option<usize>,
    iceberg_threshold: Option<usize>,
    stop_threshold: Option<usize>,
}

/// Maps header cells to fields by keyword containment. The first matching
/// column wins when a keyword appears twice.
fn map_columns(header_cells: &[&str]) -> ColumnMap {
    let mut map = ColumnMap::default();
    for (index, raw) in header_cells.iter().enumerate() {
        let cell = strip_quotes(raw).to_lowercase();
        if cell.contains("symbol") || cell.contains("instrument") {
            map.symbol.get_or_insert(index);
        } else if cell.contains("tick") && cell.contains("size") {
            map.tick_size.get_or_insert(index);
        } else if cell.contains("tick") && cell.contains("point") && !cell.contains("value") {
            map.tick_per_point.get_or_insert(index);
        } else if cell.contains("tick") && cell.contains("value") {
            map.tick_value.get_or_insert(index);
        } else if cell.contains("point") && cell.contains("value") {
            map.point_value.get_or_insert(index);
        } else if cell.contains("iceberg") {
            map.iceberg_threshold.get_or_insert(index);
        } else if cell.contains("stop") {
            map.stop_threshold.get_or_insert(index);
        }
    }
    map
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of instrument rows parsed and stored.
    pub count: usize,
}

/// Why a file could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Required columns could not be located in the header.
    MissingColumns(Vec<&'static str>),
    /// The header mapped but no data row survived parsing.
    NoRows,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns(names) => write!(
                f,
                "import failed: could not locate required column(s): {}",
                names.join(", ")
            ),
            Self::NoRows => write!(f, "import failed: no instrument rows could be parsed"),
        }
    }
}

impl std::error::Error for ImportError {}

/// Parses a user-supplied instrument file into rows with fresh ids.
///
/// Splits on any newline convention, strips a leading byte-order marker,
/// votes the delimiter on the header line, and maps columns by keyword.
/// Point value is stored exactly as the file carries it — this path never
/// recomputes it from tick value and ticks-per-point.
pub fn parse_instrument_file(contents: &str) -> Result<Vec<Instrument>, ImportError> {
    let text = strip_bom(contents);
    let mut lines = split_lines(text).filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Err(ImportError::MissingColumns(vec!["symbol", "tick size"]));
    };

    // Voting on the header keeps decimal commas in the data rows from
    // outvoting a semicolon separator.
    let delimiter = Delimiter::detect(header_line);
    let header_cells: Vec<&str> = header_line.split(delimiter.as_char()).collect();
    let map = map_columns(&header_cells);

    let mut missing = Vec::new();
    if map.symbol.is_none() {
        missing.push("symbol");
    }
    if map.tick_size.is_none() {
        missing.push("tick size");
    }
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(delimiter.as_char()).collect();
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| fields.get(i))
                .map(|s| strip_quotes(s))
                .unwrap_or("")
        };

        let symbol = cell(map.symbol);
        if symbol.is_empty() {
            continue;
        }

        rows.push(Instrument {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            tick_size: parse_loose(cell(map.tick_size)),
            tick_value: parse_loose(cell(map.tick_value)),
            tick_per_point: parse_loose(cell(map.tick_per_point)),
            point_value: parse_loose(cell(map.point_value)),
            iceberg_threshold: parse_loose(cell(map.iceberg_threshold)),
            stop_threshold: parse_loose(cell(map.stop_threshold)),
        });
    }

    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_spec_headers_by_keyword() {
        let contents = "Instrument, Tick Size, Tick Value, Tick/Point, Point Value\n\
                        ES,0.25,12.50,4,50.00\n";
        let rows = parse_instrument_file(contents).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.symbol, "ES");
        assert_eq!(row.tick_size, 0.25);
        assert_eq!(row.tick_value, 12.5);
        assert_eq!(row.tick_per_point, 4.0);
        assert_eq!(row.point_value, 50.0);
    }

    #[test]
    fn column_order_does_not_matter() {
        let contents = "Point Value,Symbol,Tick/Point,Tick Value,Tick Size\n\
                        50.00,ES,4,12.50,0.25\n";
        let rows = parse_instrument_file(contents).unwrap();
        let row = &rows[0];
        assert_eq!(row.symbol, "ES");
        assert_eq!(row.tick_size, 0.25);
        assert_eq!(row.tick_value, 12.5);
        assert_eq!(row.tick_per_point, 4.0);
        assert_eq!(row.point_value, 50.0);
    }

    #[test]
    fn point_value_is_stored_not_recomputed() {
        // 12.5 * 4 would be 50; the file says 99 and the import keeps 99.
        let contents = "Symbol,Tick Size,Tick Value,Tick/Point,Point Value\nES,0.25,12.5,4,99\n";
        let rows = parse_instrument_file(contents).unwrap();
        assert_eq!(rows[0].point_value, 99.0);
    }

    #[test]
    fn missing_required_columns_are_named() {
        let contents = "Name,Size\nES,0.25\n";
        let err = parse_instrument_file(contents).unwrap_err();
        assert_eq!(err, ImportError::MissingColumns(vec!["symbol", "tick size"]));
        assert!(err.to_string().contains("symbol"));

        let contents = "Symbol,Width\nES,0.25\n";
        let err = parse_instrument_file(contents).unwrap_err();
        assert_eq!(err, ImportError::MissingColumns(vec!["tick size"]));
    }

    #[test]
    fn empty_input_reports_missing_columns() {
        let err = parse_instrument_file("").unwrap_err();
        assert!(matches!(err, ImportError::MissingColumns(_)));
    }

    #[test]
    fn header_only_file_reports_no_rows() {
        let contents = "Symbol,Tick Size\n";
        assert_eq!(parse_instrument_file(contents).unwrap_err(), ImportError::NoRows);
    }

    #[test]
    fn rows_without_symbol_are_skipped() {
        let contents = "Symbol,Tick Size\n,0.25\nES,0.25\n";
        let rows = parse_instrument_file(contents).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn bom_and_crlf_are_tolerated() {
        let contents = "\u{feff}Symbol,Tick Size\r\nES,0.25\r\nNQ,0.25\r\n";
        let rows = parse_instrument_file(contents).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "ES");
    }

    #[test]
    fn semicolon_delimited_files_import() {
        let contents = "Symbol;Tick Size;Tick Value;Tick/Point;Point Value\nFDAX;0.5;12.5;2;25\n";
        let rows = parse_instrument_file(contents).unwrap();
        assert_eq!(rows[0].symbol, "FDAX");
        assert_eq!(rows[0].tick_size, 0.5);
        assert_eq!(rows[0].point_value, 25.0);
    }

    #[test]
    fn currency_and_quoted_cells_parse() {
        let contents = "Symbol,Tick Size,Tick Value,Point Value\n\"ES\",0.25,\"$12.50\",\"$1000\"\n";
        let rows = parse_instrument_file(contents).unwrap();
        assert_eq!(rows[0].symbol, "ES");
        assert_eq!(rows[0].tick_value, 12.5);
        assert_eq!(rows[0].point_value, 1000.0);
    }

    #[test]
    fn unmapped_columns_default_to_zero() {
        let contents = "Symbol,Tick Size\nES,0.25\n";
        let rows = parse_instrument_file(contents).unwrap();
        assert_eq!(rows[0].tick_value, 0.0);
        assert_eq!(rows[0].point_value, 0.0);
        assert_eq!(rows[0].iceberg_threshold, 0.0);
    }
}
