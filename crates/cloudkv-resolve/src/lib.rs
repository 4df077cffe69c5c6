//! Conflict resolution for cloudkv.
//!
//! When the same key appears in more than one blob, the store engine asks a
//! [`ConflictResolver`] which record is current. The resolver also stamps the
//! version metadata of every locally written record, so the version scheme
//! (timestamps, counters, vector clocks) is entirely its business.
//!
//! [`LwwResolver`] is the reference policy: last write wins by an ISO-8601
//! timestamp taken from an injectable [`TimestampSource`].

pub mod clock;
pub mod error;
pub mod lww;
pub mod resolver;

pub use clock::{FixedTimestamp, SystemClock, TimestampSource};
pub use error::{ResolveError, ResolveResult};
pub use lww::{LwwResolver, TIMESTAMP_FIELD};
pub use resolver::ConflictResolver;
