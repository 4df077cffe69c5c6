use std::sync::Arc;

use cloudkv_types::{Record, Values, Version};

use crate::error::ResolveResult;

/// Policy deciding record versions and merge winners.
///
/// The store engine depends only on this trait and never inspects a
/// [`Version`]; swapping the policy (vector clocks, per-field merge, ...)
/// needs no engine changes.
pub trait ConflictResolver: Send + Sync {
    /// Version for a key written for the first time.
    fn stamp_new_record(&self, values: &Values) -> Version;

    /// Version for a key overwritten locally. `current_version` belongs to
    /// the record being replaced, for schemes that need monotonic counters
    /// or causal history.
    fn stamp_existing_record(&self, values: &Values, current_version: &Version) -> Version;

    /// Pick the current record for `key`, seen as `one` in an earlier-listed
    /// blob and as `two` in a later one.
    ///
    /// Must be a pure, deterministic function of its inputs: a load may call
    /// it many times, in any order.
    fn handle_conflict(&self, key: &str, one: Record, two: Record) -> ResolveResult<Record>;
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for Arc<R> {
    fn stamp_new_record(&self, values: &Values) -> Version {
        (**self).stamp_new_record(values)
    }

    fn stamp_existing_record(&self, values: &Values, current_version: &Version) -> Version {
        (**self).stamp_existing_record(values, current_version)
    }

    fn handle_conflict(&self, key: &str, one: Record, two: Record) -> ResolveResult<Record> {
        (**self).handle_conflict(key, one, two)
    }
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for Box<R> {
    fn stamp_new_record(&self, values: &Values) -> Version {
        (**self).stamp_new_record(values)
    }

    fn stamp_existing_record(&self, values: &Values, current_version: &Version) -> Version {
        (**self).stamp_existing_record(values, current_version)
    }

    fn handle_conflict(&self, key: &str, one: Record, two: Record) -> ResolveResult<Record> {
        (**self).handle_conflict(key, one, two)
    }
}
