//! Futures contract specifications.

use serde::{Deserialize, Serialize};

/// Contract specification for a tradable futures instrument.
///
/// `point_value` is the monetary value of a one-point move for one
/// contract. On the form path it is derived as `tick_value *
/// tick_per_point` at write time by [`InstrumentSpec::from_form`]; import
/// paths store whatever the source file carries. Stored field names are
/// the persisted storage schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Generated unique id. `symbol` is the human-facing key but is not
    /// guaranteed unique.
    pub id: String,
    pub symbol: String,
    pub tick_size: f64,
    pub tick_value: f64,
    pub tick_per_point: f64,
    pub point_value: f64,
    #[serde(default)]
    pub iceberg_threshold: f64,
    #[serde(default)]
    pub stop_threshold: f64,
}

/// Id-less input shape used by the form and import paths.
///
/// The repository assigns the id when the spec is added.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSpec {
    pub symbol: String,
    pub tick_size: f64,
    pub tick_value: f64,
    pub tick_per_point: f64,
    pub point_value: f64,
    pub iceberg_threshold: f64,
    pub stop_threshold: f64,
}

impl InstrumentSpec {
    /// Builds a spec from form fields, deriving `point_value` from
    /// `tick_value * tick_per_point`.
    pub fn from_form(
        symbol: impl Into<String>,
        tick_size: f64,
        tick_value: f64,
        tick_per_point: f64,
        iceberg_threshold: f64,
        stop_threshold: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size,
            tick_value,
            tick_per_point,
            point_value: tick_value * tick_per_point,
            iceberg_threshold,
            stop_threshold,
        }
    }

    /// Attaches a freshly generated id.
    pub(crate) fn into_instrument(self) -> Instrument {
        Instrument {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: self.symbol,
            tick_size: self.tick_size,
            tick_value: self.tick_value,
            tick_per_point: self.tick_per_point,
            point_value: self.point_value,
            iceberg_threshold: self.iceberg_threshold,
            stop_threshold: self.stop_threshold,
        }
    }
}

impl Instrument {
    /// Renders the instrument as one row of the export CSV format:
    /// `Symbol,TickSize,TickValue,TickPerPoint,PointValue,IcebergThreshold,StopThreshold`.
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.symbol,
            self.tick_size,
            self.tick_value,
            self.tick_per_point,
            self.point_value,
            self.iceberg_threshold,
            self.stop_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_path_derives_point_value() {
        let spec = InstrumentSpec::from_form("ES", 0.25, 12.5, 4.0, 150.0, 150.0);
        assert_eq!(spec.point_value, 50.0);
    }

    #[test]
    fn csv_row_matches_export_order() {
        let inst = InstrumentSpec::from_form("NQ", 0.25, 5.0, 4.0, 100.0, 200.0).into_instrument();
        assert_eq!(inst.csv_row(), "NQ,0.25,5,4,20,100,200");
    }

    #[test]
    fn deserializes_storage_schema() {
        let json = r#"{
            "id": "abc",
            "symbol": "ES",
            "tickSize": 0.25,
            "tickValue": 12.5,
            "tickPerPoint": 4.0,
            "pointValue": 50.0,
            "icebergThreshold": 150.0,
            "stopThreshold": 100.0
        }"#;
        let inst: Instrument = serde_json::from_str(json).unwrap();
        assert_eq!(inst.symbol, "ES");
        assert_eq!(inst.tick_per_point, 4.0);
        assert_eq!(inst.point_value, 50.0);
    }

    #[test]
    fn missing_thresholds_default_to_zero() {
        let json = r#"{
            "id": "abc",
            "symbol": "ES",
            "tickSize": 0.25,
            "tickValue": 12.5,
            "tickPerPoint": 4.0,
            "pointValue": 50.0
        }"#;
        let inst: Instrument = serde_json::from_str(json).unwrap();
        assert_eq!(inst.iceberg_threshold, 0.0);
        assert_eq!(inst.stop_threshold, 0.0);
    }
}
