use omi_crypto::SignatureError;
use omi_protocol::ProtocolError;
use omi_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("ledger returned HTTP {status} for {url}")]
    Transport { status: u16, url: String },

    #[error("no state at address {address}")]
    NotFound { address: String },

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("signing error: {0}")]
    Signing(#[from] SignatureError),

    #[error("invalid record: {0}")]
    InvalidRecord(#[from] TypeError),

    #[error("protocol error: {0}")]
    Protocol(ProtocolError),

    #[error("malformed response from {url}: {reason}")]
    Json { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Status code of a non-success ledger response, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Decoding { what, reason } => Self::Decoding(format!("{what}: {reason}")),
            ProtocolError::Signing(e) => Self::Signing(e),
            ProtocolError::InvalidRecord(e) => Self::InvalidRecord(e),
            other => Self::Protocol(other),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
