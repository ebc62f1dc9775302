//! Remote spreadsheet ingestion.
//!
//! Users paste whatever sheet link they have at hand — edit links,
//! publish-to-web links, raw document ids, or a direct CSV URL. The
//! pipeline normalizes the link into export-endpoint candidates, then
//! walks an ordered list of fetch strategies (direct, then passthrough
//! relays) until one returns delimiter-separated text. Attempts run
//! sequentially and stop at the first acceptance; when everything fails
//! the caller gets one aggregated, deduplicated diagnostic.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::ingest::{Delimiter, split_lines, strip_bom, strip_quotes};
use crate::models::Instrument;
use crate::numeric::parse_loose;

/// A normalized reference to a remote sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    /// A document id extracted from an edit link or pasted bare.
    Document { doc_id: String, gid: String },
    /// A publish-to-web id (`/spreadsheets/d/e/...` links).
    Published { pub_id: String, gid: String },
    /// No identifier found; the input is fetched as-is.
    Direct(String),
}

/// Returns the path segment following `marker`, up to `/`, `?`, or `#`.
fn path_segment_after<'a>(input: &'a str, marker: &str) -> Option<&'a str> {
    let start = input.find(marker)? + marker.len();
    let rest = &input[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let segment = &rest[..end];
    (!segment.is_empty()).then_some(segment)
}

/// Pulls a numeric `gid=` tab identifier out of a query string or
/// fragment. Defaults to tab `0`.
fn extract_gid(input: &str) -> String {
    if let Some(pos) = input.find("gid=") {
        let digits: String = input[pos + 4..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if !digits.is_empty() {
            return digits;
        }
    }
    "0".to_string()
}

/// Document ids are long tokens of URL-safe characters.
fn is_bare_document_id(input: &str) -> bool {
    input.len() >= 25
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn push_unique(list: &mut Vec<String>, entry: String) {
    if !list.contains(&entry) {
        list.push(entry);
    }
}

impl SheetRef {
    /// Normalizes a pasted link or id into a [`SheetRef`].
    pub fn parse(input: &str) -> SheetRef {
        let input = input.trim();
        // The publish marker is a prefix of the edit marker, so it must be
        // checked first.
        if let Some(pub_id) = path_segment_after(input, "/spreadsheets/d/e/") {
            return SheetRef::Published {
                pub_id: pub_id.to_string(),
                gid: extract_gid(input),
            };
        }
        if let Some(doc_id) = path_segment_after(input, "/spreadsheets/d/") {
            return SheetRef::Document {
                doc_id: doc_id.to_string(),
                gid: extract_gid(input),
            };
        }
        if is_bare_document_id(input) {
            return SheetRef::Document {
                doc_id: input.to_string(),
                gid: "0".to_string(),
            };
        }
        SheetRef::Direct(input.to_string())
    }

    /// Builds the ordered list of equivalent export endpoints to try.
    ///
    /// The raw input (when it is itself a URL) always comes first, then the
    /// tabular export, the account-scoped export, the query-based export,
    /// and the publication endpoint, each carrying the tab id.
    pub fn candidate_urls(&self, original: &str) -> Vec<String> {
        let original = original.trim();
        let mut urls = Vec::new();
        match self {
            SheetRef::Direct(url) => urls.push(url.clone()),
            SheetRef::Published { pub_id, gid } => {
                if original.starts_with("http") {
                    push_unique(&mut urls, original.to_string());
                }
                push_unique(
                    &mut urls,
                    format!(
                        "https://docs.google.com/spreadsheets/d/e/{pub_id}/pub?output=csv&gid={gid}"
                    ),
                );
            }
            SheetRef::Document { doc_id, gid } => {
                if original.starts_with("http") {
                    push_unique(&mut urls, original.to_string());
                }
                push_unique(
                    &mut urls,
                    format!(
                        "https://docs.google.com/spreadsheets/d/{doc_id}/export?format=csv&gid={gid}"
                    ),
                );
                push_unique(
                    &mut urls,
                    format!(
                        "https://docs.google.com/spreadsheets/u/0/d/{doc_id}/export?format=csv&gid={gid}"
                    ),
                );
                push_unique(
                    &mut urls,
                    format!(
                        "https://docs.google.com/spreadsheets/d/{doc_id}/gviz/tq?tqx=out:csv&gid={gid}"
                    ),
                );
                push_unique(
                    &mut urls,
                    format!(
                        "https://docs.google.com/spreadsheets/d/{doc_id}/pub?output=csv&gid={gid}"
                    ),
                );
            }
        }
        urls
    }
}

/// Ordered fetch strategies: a direct request first, then passthrough
/// relays for sources that refuse direct reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    Direct,
    AllOrigins,
    CorsProxy,
    CodeTabs,
}

impl FetchStrategy {
    pub const ALL: [FetchStrategy; 4] = [
        FetchStrategy::Direct,
        FetchStrategy::AllOrigins,
        FetchStrategy::CorsProxy,
        FetchStrategy::CodeTabs,
    ];

    /// Short name used in aggregated failure reports.
    pub fn label(self) -> &'static str {
        match self {
            FetchStrategy::Direct => "Direct",
            FetchStrategy::AllOrigins => "AllOrigins",
            FetchStrategy::CorsProxy => "CORSProxy",
            FetchStrategy::CodeTabs => "CodeTabs",
        }
    }

    /// Wraps the target URL for this strategy.
    ///
    /// The direct strategy appends a cache-busting query parameter so a
    /// relay or intermediate cache cannot serve a stale copy of the sheet.
    pub fn wrap(self, url: &str) -> String {
        match self {
            FetchStrategy::Direct => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{url}{separator}cb={}", unix_millis())
            }
            FetchStrategy::AllOrigins => {
                format!("https://api.allorigins.win/raw?url={}", url_encode(url))
            }
            FetchStrategy::CorsProxy => {
                format!("https://corsproxy.io/?{}", url_encode(url))
            }
            FetchStrategy::CodeTabs => {
                format!("https://api.codetabs.com/v1/proxy?quest={}", url_encode(url))
            }
        }
    }
}

fn url_encode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Structural check that a response body is delimiter-separated text
/// rather than an HTML consent page or a JSON error envelope.
pub fn looks_tabular(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.starts_with('<') || trimmed.starts_with('{') || trimmed.contains("<html") {
        return false;
    }
    let Some(first_line) = split_lines(trimmed).find(|l| !l.trim().is_empty()) else {
        return false;
    };
    let delimiter = Delimiter::detect(first_line);
    first_line.split(delimiter.as_char()).count() >= 2
}

/// Outcome of a successful sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of instrument rows parsed and stored.
    pub count: usize,
}

/// Why a sync produced no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No remote source URL is configured.
    NotConfigured,
    /// Every candidate endpoint × strategy combination failed or returned
    /// non-tabular content.
    AllAttemptsFailed {
        /// Distinct failure reasons in first-seen order.
        reasons: Vec<String>,
        /// Failure signatures suggest an access or consent wall.
        access_hint: bool,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "no sheet URL is configured"),
            Self::AllAttemptsFailed {
                reasons,
                access_hint,
            } => {
                if *access_hint {
                    writeln!(
                        f,
                        "access denied by the source (HTTP 401/403 or a sign-in page)."
                    )?;
                    writeln!(
                        f,
                        "If this is a Google Sheet, publish it to the web or share it with \"Anyone with the link\", then paste the CSV link."
                    )?;
                } else {
                    writeln!(f, "sync failed: every fetch attempt was rejected.")?;
                }
                write!(f, "Details:")?;
                for reason in reasons {
                    write!(f, "\n  {reason}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SyncError {}

/// Fetches sheet contents, trying every candidate endpoint with every
/// strategy in order and accepting the first tabular response.
pub async fn fetch_csv_with_fallback(
    client: &reqwest::Client,
    input: &str,
) -> Result<String, SyncError> {
    let sheet = SheetRef::parse(input);
    let candidates = sheet.candidate_urls(input);

    let mut reasons: Vec<String> = Vec::new();
    let mut access_hint = false;

    for candidate in &candidates {
        for strategy in FetchStrategy::ALL {
            let target = strategy.wrap(candidate);
            debug!(strategy = strategy.label(), url = %candidate, "fetching sheet");
            match client.get(&target).send().await {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        if status.as_u16() == 401 || status.as_u16() == 403 {
                            access_hint = true;
                        }
                        push_unique(
                            &mut reasons,
                            format!("{}: HTTP {}", strategy.label(), status.as_u16()),
                        );
                        continue;
                    }
                    match response.text().await {
                        Ok(body) if looks_tabular(&body) => return Ok(body),
                        Ok(body) => {
                            if body.trim_start().starts_with('<') {
                                access_hint = true;
                            }
                            push_unique(
                                &mut reasons,
                                format!(
                                    "{}: response is not delimiter-separated text",
                                    strategy.label()
                                ),
                            );
                        }
                        Err(e) => {
                            push_unique(&mut reasons, format!("{}: {e}", strategy.label()));
                        }
                    }
                }
                Err(e) => {
                    push_unique(&mut reasons, format!("{}: {e}", strategy.label()));
                }
            }
        }
    }

    Err(SyncError::AllAttemptsFailed {
        reasons,
        access_hint,
    })
}

/// Parses sheet text into instrument rows.
///
/// The export column order is fixed: symbol, tick size, tick value, ticks
/// per point, point value, iceberg threshold, stop threshold. The header
/// line is discarded, rows without a symbol or tick size are skipped, and
/// every surviving row receives a fresh id.
pub fn parse_sheet_rows(text: &str) -> Vec<Instrument> {
    let text = strip_bom(text);
    let delimiter = Delimiter::detect(text);

    let mut lines = split_lines(text).filter(|l| !l.trim().is_empty());
    if lines.next().is_none() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(delimiter.as_char()).collect();
        let field = |i: usize| fields.get(i).map(|s| strip_quotes(s)).unwrap_or("");

        let symbol = field(0);
        let tick_size = field(1);
        if symbol.is_empty() || tick_size.is_empty() {
            continue;
        }

        rows.push(Instrument {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            tick_size: parse_loose(tick_size),
            tick_value: parse_loose(field(2)),
            tick_per_point: parse_loose(field(3)),
            point_value: parse_loose(field(4)),
            iceberg_threshold: parse_loose(field(5)),
            stop_threshold: parse_loose(field(6)),
        });
    }
    rows
}
