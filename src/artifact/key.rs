//! Storage keys for rendered charts

use crate::market::{Granularity, Symbol};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

/// `{symbol}/{granularity}/{YYYY-MM-DD}/{HH:MM}/plot.png`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the storage key for a chart. Resolution is one minute: any two
/// timestamps within the same UTC minute map to the same key.
pub fn key_for(symbol: &Symbol, granularity: Granularity, issued_at: DateTime<Utc>) -> ArtifactKey {
    ArtifactKey(format!(
        "{symbol}/{granularity}/{}/{}/plot.png",
        issued_at.format("%Y-%m-%d"),
        issued_at.format("%H:%M"),
    ))
}

/// Wire form of `issued_at` used in plot-service URLs and JSON responses
pub fn format_issued_at(issued_at: DateTime<Utc>) -> String {
    issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Accepts RFC 3339 as well as the older `2024-01-31 12:05:00.123456`
/// form (interpreted as UTC).
pub fn parse_issued_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
