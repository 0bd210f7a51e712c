use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition violations raised by dictionaries, collections and queries.
///
/// Every variant describes a programming error detected at the call that
/// caused it. Expected misses (absent keys, empty sequences asked for an
/// optional element) are reported as `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("the key is unspecified")]
    InvalidKey,

    #[error("capacity {requested} exceeds the largest supported dictionary size")]
    CapacityExceeded { requested: usize },

    #[error("the sequence contains no matching element")]
    EmptySequence,

    #[error("the sequence contains more than one matching element")]
    MultipleMatches,

    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("the sequence cannot be ordered: expected {expected} keys, found {found}")]
    IncomparableType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid range: {0}")]
    InvalidRange(&'static str),
}
