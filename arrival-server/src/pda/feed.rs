//! Live arrival feed DTOs.
//!
//! `StopLocationDyna` returns a JSON object with an update time and one
//! entry per route at the stop. Each entry packs its live values into a
//! comma-separated `n1` string.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{ArrivalSignal, NOT_AVAILABLE};

use super::error::{Document, PdaError};

/// Raw `StopLocationDyna` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DynaFeed {
    /// Feed generation time; HTML-entity encoded (`12&#x3a;30&#x3a;00`).
    #[serde(rename = "UpdateTime")]
    pub update_time: Option<String>,

    /// Kept as raw values so one badly typed entry is skipped on its own.
    #[serde(rename = "Stop")]
    pub stops: Option<Vec<serde_json::Value>>,
}

/// One route entry of the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct StopEntry {
    /// Numeric in practice, occasionally a string.
    pub id: Option<serde_json::Value>,

    /// Packed live values, see [`N1Record`].
    pub n1: Option<String>,
}

impl StopEntry {
    /// The entry id rendered as a string (`482` and `"482"` both give `"482"`).
    pub fn entry_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// The fields of an `n1` string this client uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct N1Record {
    /// Per-route key, matching the stop page's time cell.
    pub dynamic_key: String,
    /// Seconds until arrival, or a status code.
    pub time_remaining: String,
}

impl N1Record {
    /// Number of comma-separated fields in a complete record.
    pub const WIDTH: usize = 8;

    const DYNAMIC_KEY: usize = 1;
    const TIME_REMAINING: usize = 7;

    /// Decode an `n1` string. Returns `None` if it has fewer than
    /// [`WIDTH`](Self::WIDTH) fields.
    pub fn decode(n1: &str) -> Option<Self> {
        let fields: Vec<&str> = n1.split(',').collect();
        if fields.len() < Self::WIDTH {
            return None;
        }

        Some(Self {
            dynamic_key: fields[Self::DYNAMIC_KEY].to_string(),
            time_remaining: fields[Self::TIME_REMAINING].to_string(),
        })
    }
}

/// Decoded feed: update time and one signal per usable entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub update_time: String,
    pub signals: Vec<ArrivalSignal>,
}

impl From<DynaFeed> for FeedSnapshot {
    fn from(feed: DynaFeed) -> Self {
        let update_time = feed
            .update_time
            .map(|t| html_escape::decode_html_entities(&t).into_owned())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let entries = feed.stops.unwrap_or_default();
        let total = entries.len();

        let signals: Vec<ArrivalSignal> = entries
            .iter()
            .filter_map(signal_from_entry)
            .collect();

        debug!(
            entries = total,
            skipped = total - signals.len(),
            "Decoded arrival feed"
        );

        Self {
            update_time,
            signals,
        }
    }
}

/// Entries that are not `{id, n1}` objects, or lack an id, or whose `n1`
/// is short, are skipped.
fn signal_from_entry(value: &serde_json::Value) -> Option<ArrivalSignal> {
    let entry = StopEntry::deserialize(value).ok()?;
    let record = N1Record::decode(entry.n1.as_deref()?)?;
    Some(ArrivalSignal {
        entry_id: entry.entry_id()?,
        dynamic_key: record.dynamic_key,
        raw_time_value: record.time_remaining,
    })
}

/// Parse a `StopLocationDyna` body.
pub fn parse_feed(body: &str) -> Result<FeedSnapshot, PdaError> {
    let feed: DynaFeed = serde_json::from_str(body).map_err(|e| PdaError::Parse {
        document: Document::ArrivalFeed,
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    Ok(feed.into())
}
