//! Wire protocol for the OMI ledger client.
//!
//! Defines the canonical payload codec, the transaction/batch envelopes the
//! validator verifies, the builders that assemble and sign them, and the
//! JSON shapes of the ledger's REST responses.

pub mod builder;
pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use builder::{random_nonce, BatchBuilder, SignedBatch, SignedTransaction, TransactionBuilder};
pub use codec::PayloadCodec;
pub use endpoint::{
    endpoints, BatchStatusResponse, CommitStatus, Paging, StateEntry, StateEntryResponse,
    StateListResponse, SubmitResponse,
};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    Batch, BatchHeader, BatchList, OmiTransactionPayload, Transaction, TransactionHeader,
    FAMILY_VERSION, PAYLOAD_ENCODING,
};
