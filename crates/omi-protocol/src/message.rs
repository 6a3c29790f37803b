//! Ledger wire messages.
//!
//! These mirror the validator's protobuf schema field for field; the header
//! bytes produced here are what gets signed and re-verified remotely.

/// Transaction family version understood by the omi processor.
pub const FAMILY_VERSION: &str = "1.0";

/// Encoding tag advertised for transaction payloads.
pub const PAYLOAD_ENCODING: &str = "application/protobuf";

#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct TransactionHeader {
    #[prost(string, tag = "1")]
    pub batcher_pubkey: String,
    #[prost(string, repeated, tag = "2")]
    pub dependencies: Vec<String>,
    #[prost(string, tag = "3")]
    pub family_name: String,
    #[prost(string, tag = "4")]
    pub family_version: String,
    #[prost(string, repeated, tag = "5")]
    pub inputs: Vec<String>,
    #[prost(string, tag = "6")]
    pub nonce: String,
    #[prost(string, repeated, tag = "7")]
    pub outputs: Vec<String>,
    #[prost(string, tag = "8")]
    pub payload_encoding: String,
    #[prost(string, tag = "9")]
    pub payload_sha512: String,
    #[prost(string, tag = "10")]
    pub signer_pubkey: String,
}

#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct Transaction {
    #[prost(bytes = "vec", tag = "1")]
    pub header: Vec<u8>,
    #[prost(string, tag = "2")]
    pub header_signature: String,
    #[prost(bytes = "vec", tag = "3")]
    pub payload: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct BatchHeader {
    #[prost(string, tag = "1")]
    pub signer_pubkey: String,
    #[prost(string, repeated, tag = "2")]
    pub transaction_ids: Vec<String>,
}

#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct Batch {
    #[prost(bytes = "vec", tag = "1")]
    pub header: Vec<u8>,
    #[prost(string, tag = "2")]
    pub header_signature: String,
    #[prost(message, repeated, tag = "3")]
    pub transactions: Vec<Transaction>,
}

#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct BatchList {
    #[prost(message, repeated, tag = "1")]
    pub batches: Vec<Batch>,
}

/// Envelope the omi processor unpacks: which action, and the encoded record.
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct OmiTransactionPayload {
    #[prost(string, tag = "1")]
    pub action: String,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}
