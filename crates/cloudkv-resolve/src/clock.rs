use chrono::{SecondsFormat, Utc};

/// Source of "now" for version stamps, as a sortable ISO-8601 string.
///
/// Injected into [`LwwResolver`](crate::LwwResolver) so tests can pin time.
/// Any `Fn() -> String` closure is a source.
pub trait TimestampSource: Send + Sync {
    fn now(&self) -> String;
}

impl<F> TimestampSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn now(&self) -> String {
        self()
    }
}

/// Wall clock, UTC, millisecond precision: `2024-07-26T01:01:33.907Z`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimestampSource for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Always returns the same timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedTimestamp(pub String);

impl FixedTimestamp {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl TimestampSource for FixedTimestamp {
    fn now(&self) -> String {
        self.0.clone()
    }
}
