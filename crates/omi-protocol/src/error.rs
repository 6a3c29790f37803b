use omi_crypto::SignatureError;
use omi_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("cannot decode {what}: {reason}")]
    Decoding { what: String, reason: String },

    #[error("signing error: {0}")]
    Signing(#[from] SignatureError),

    #[error("invalid record: {0}")]
    InvalidRecord(#[from] TypeError),

    #[error("payload digest mismatch: {0}")]
    DigestMismatch(String),

    #[error("batch contains no transactions")]
    EmptyBatch,

    #[error("batch header does not match its transactions: {0}")]
    BatchMismatch(String),
}

impl ProtocolError {
    pub(crate) fn decoding(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decoding {
            what: what.into(),
            reason: err.to_string(),
        }
    }
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
