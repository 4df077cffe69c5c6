use thiserror::Error;

/// Errors a resolver may signal while merging two records.
///
/// The bundled resolvers never fail; this exists for policies that can
/// refuse a merge (e.g. incomparable causal metadata).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("cannot resolve conflict for key {key}: {reason}")]
    Rejected { key: String, reason: String },
}

pub type ResolveResult<T> = Result<T, ResolveError>;
