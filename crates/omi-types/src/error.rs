use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid address length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("address {0} is outside the omi namespace")]
    ForeignAddress(String),

    #[error("unknown object kind: {0}")]
    UnknownKind(String),

    #[error("{kind} has an empty natural key")]
    EmptyNaturalKey { kind: &'static str },

    #[error("split for {name} is {split}%, must be at most 100")]
    InvalidSplit { name: String, split: u32 },
}
