use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use cloudkv_types::{Record, Values, Version};
use tracing::trace;

use crate::clock::{SystemClock, TimestampSource};
use crate::error::ResolveResult;
use crate::resolver::ConflictResolver;

/// Version field holding the write time.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Last-write-wins conflict resolution.
///
/// Every local write is stamped `{"timestamp": <ISO-8601>}`. On conflict the
/// record with the strictly later timestamp wins. Timestamps without an
/// offset, and bare dates, count as UTC. Equal timestamps, or a
/// missing/unparsable timestamp on either side, resolve to the second
/// argument (the record from the later-listed blob).
#[derive(Clone)]
pub struct LwwResolver {
    source: Arc<dyn TimestampSource>,
}

impl LwwResolver {
    /// Resolver stamping with the system clock.
    pub fn new() -> Self {
        Self::with_source(SystemClock)
    }

    /// Resolver stamping with a custom time source.
    pub fn with_source(source: impl TimestampSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    fn stamp(&self) -> Version {
        Version::from([(TIMESTAMP_FIELD.to_string(), self.source.now())])
    }
}

impl Default for LwwResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LwwResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LwwResolver").finish_non_exhaustive()
    }
}

fn written_at(record: &Record) -> Option<DateTime<Utc>> {
    parse_instant(record.version().get(TIMESTAMP_FIELD)?)
}

/// ISO-8601 instant. Timestamps without an offset, and bare dates, are UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at.and_utc());
        }
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

impl ConflictResolver for LwwResolver {
    fn stamp_new_record(&self, _values: &Values) -> Version {
        self.stamp()
    }

    fn stamp_existing_record(&self, _values: &Values, _current_version: &Version) -> Version {
        self.stamp()
    }

    fn handle_conflict(&self, key: &str, one: Record, two: Record) -> ResolveResult<Record> {
        let first_wins = match (written_at(&one), written_at(&two)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        };
        trace!(key, first_wins, "lww conflict resolved");
        Ok(if first_wins { one } else { two })
    }
}
