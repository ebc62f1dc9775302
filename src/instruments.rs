//! Instrument repository.
//!
//! Owns the instrument collection and the remote-source state machine.
//! While a sheet URL is configured the repository is read-only: the data
//! is managed in the remote sheet and local edits are silently ignored.
//! `replace_all` stays available in that mode because the ingestion
//! pipelines are the only writers allowed to touch a remote-backed set.

use tracing::{info, warn};

use crate::ingest::file::{ImportError, ImportReport, parse_instrument_file};
use crate::ingest::sheet::{SyncError, SyncReport, fetch_csv_with_fallback, parse_sheet_rows};
use crate::models::{Instrument, InstrumentSpec};
use crate::storage::{BlobStore, keys};

/// Header of the export CSV; also the fixed column order the sheet
/// parser expects on read-back.
pub const EXPORT_HEADER: &str =
    "Symbol,TickSize,TickValue,TickPerPoint,PointValue,IcebergThreshold,StopThreshold";

/// Instrument collection with injected persistence.
pub struct InstrumentBook {
    store: Box<dyn BlobStore>,
    instruments: Vec<Instrument>,
    sheet_url: String,
}

impl InstrumentBook {
    /// Loads the collection and source URL from the store.
    ///
    /// Missing or corrupt blobs load as an empty collection — persistence
    /// problems are never fatal.
    pub fn load(store: Box<dyn BlobStore>) -> Self {
        let instruments = match store.get(keys::INSTRUMENTS) {
            Some(blob) => match serde_json::from_str(&blob) {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "corrupt instrument blob, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let sheet_url = store
            .get(keys::SHEET_URL)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        Self {
            store,
            instruments,
            sheet_url,
        }
    }

    /// Instruments in insertion order.
    pub fn list(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }

    /// True while a remote source URL is configured, regardless of whether
    /// the last sync succeeded.
    pub fn is_read_only(&self) -> bool {
        !self.sheet_url.is_empty()
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    /// Configures the remote source. A non-empty URL switches the
    /// repository to read-only mode.
    pub fn set_sheet_url(&mut self, url: &str) {
        self.sheet_url = url.trim().to_string();
        self.persist_sheet_url();
    }

    /// Clears the remote source, returning the repository to writable mode.
    pub fn clear_sheet_url(&mut self) {
        self.set_sheet_url("");
    }

    /// Adds an instrument, assigning a fresh id. No-op in read-only mode.
    pub fn add(&mut self, spec: InstrumentSpec) -> Option<&Instrument> {
        if self.is_read_only() {
            return None;
        }
        self.instruments.push(spec.into_instrument());
        self.persist_instruments();
        self.instruments.last()
    }

    /// Replaces the fields of an existing instrument, keeping its id.
    /// No-op in read-only mode or when the id is unknown.
    pub fn update(&mut self, id: &str, spec: InstrumentSpec) -> bool {
        if self.is_read_only() {
            return false;
        }
        let Some(existing) = self.instruments.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        *existing = Instrument {
            id: existing.id.clone(),
            symbol: spec.symbol,
            tick_size: spec.tick_size,
            tick_value: spec.tick_value,
            tick_per_point: spec.tick_per_point,
            point_value: spec.point_value,
            iceberg_threshold: spec.iceberg_threshold,
            stop_threshold: spec.stop_threshold,
        };
        self.persist_instruments();
        true
    }

    /// Removes an instrument. Plans referencing it keep their snapshots;
    /// nothing cascades. No-op in read-only mode.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.is_read_only() {
            return false;
        }
        let before = self.instruments.len();
        self.instruments.retain(|i| i.id != id);
        if self.instruments.len() == before {
            return false;
        }
        self.persist_instruments();
        true
    }

    /// Replaces the entire collection. Ingestion-only entry point; allowed
    /// in read-only mode.
    pub fn replace_all(&mut self, instruments: Vec<Instrument>) {
        self.instruments = instruments;
        self.persist_instruments();
    }

    /// Renders the collection in the export CSV format, header first, in
    /// repository order.
    pub fn export_csv(&self) -> String {
        let mut out = String::from(EXPORT_HEADER);
        for instrument in &self.instruments {
            out.push('\n');
            out.push_str(&instrument.csv_row());
        }
        out
    }

    /// Writes the export CSV to a file for download or sheet upload.
    ///
    /// # Errors
    ///
    /// Returns [`PlanbookError::Storage`](crate::PlanbookError::Storage)
    /// when the file cannot be written.
    pub fn export_csv_to(&self, path: &std::path::Path) -> crate::Result<()> {
        std::fs::write(path, self.export_csv())?;
        Ok(())
    }

    /// Syncs the collection from the configured sheet URL.
    ///
    /// Replaces the whole collection with the parsed rows — even when the
    /// sheet is empty — and reports the count. The exclusive borrow means
    /// a second sync cannot start while one is in flight.
    pub async fn sync_from_sheet(
        &mut self,
        client: &reqwest::Client,
    ) -> Result<SyncReport, SyncError> {
        if self.sheet_url.is_empty() {
            return Err(SyncError::NotConfigured);
        }
        let url = self.sheet_url.clone();
        let text = fetch_csv_with_fallback(client, &url).await?;
        let rows = parse_sheet_rows(&text);
        let count = rows.len();
        self.replace_all(rows);
        Ok(SyncReport { count })
    }

    /// One-time initialization sync, invoked explicitly by the host after
    /// construction. Does nothing without a configured URL; failures are
    /// logged rather than surfaced — the manual sync path carries the full
    /// diagnostic.
    pub async fn startup_sync(&mut self, client: &reqwest::Client) {
        if self.sheet_url.is_empty() {
            return;
        }
        match self.sync_from_sheet(client).await {
            Ok(report) => info!(count = report.count, "startup sheet sync complete"),
            Err(e) => warn!(error = %e, "startup sheet sync failed"),
        }
    }

    /// Imports a local CSV file, replacing the collection and clearing any
    /// configured sheet URL so the imported set persists locally.
    pub fn import_csv(&mut self, contents: &str) -> Result<ImportReport, ImportError> {
        let rows = parse_instrument_file(contents)?;
        let count = rows.len();
        self.replace_all(rows);
        self.clear_sheet_url();
        Ok(ImportReport { count })
    }

    fn persist_instruments(&self) {
        match serde_json::to_string(&self.instruments) {
            Ok(blob) => {
                if let Err(e) = self.store.put(keys::INSTRUMENTS, &blob) {
                    warn!(error = %e, "failed to persist instruments");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize instruments"),
        }
    }

    fn persist_sheet_url(&self) {
        if let Err(e) = self.store.put(keys::SHEET_URL, &self.sheet_url) {
            warn!(error = %e, "failed to persist sheet url");
        }
    }
}
