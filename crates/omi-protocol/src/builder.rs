//! Transaction and batch assembly.
//!
//! A write travels as: payload envelope -> transaction header (commits to the
//! payload by SHA-512) -> signed transaction -> batch header (commits to the
//! ordered transaction ids) -> signed batch -> batch list bytes.

use omi_crypto::{PayloadHasher, PublicKey, Signature, SigningKey};
use omi_types::{Address, OmiObject, FAMILY_NAME};
use prost::Message;
use rand::RngCore;
use tracing::debug;

use crate::codec::PayloadCodec;
use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{
    Batch, BatchHeader, BatchList, Transaction, TransactionHeader, FAMILY_VERSION,
    PAYLOAD_ENCODING,
};

/// Fresh 128-bit random nonce, hex encoded.
pub fn random_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Assembles and signs transaction headers for one transaction family.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    family_name: String,
    family_version: String,
    payload_encoding: String,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self {
            family_name: FAMILY_NAME.into(),
            family_version: FAMILY_VERSION.into(),
            payload_encoding: PAYLOAD_ENCODING.into(),
        }
    }
}

impl TransactionBuilder {
    pub fn new(family_name: impl Into<String>, family_version: impl Into<String>) -> Self {
        Self {
            family_name: family_name.into(),
            family_version: family_version.into(),
            payload_encoding: PAYLOAD_ENCODING.into(),
        }
    }

    /// Build a header for `payload` with a freshly sampled nonce.
    ///
    /// The signer also acts as batcher.
    pub fn build(
        &self,
        payload: &[u8],
        inputs: &[Address],
        outputs: &[Address],
        signer: &PublicKey,
    ) -> TransactionHeader {
        self.build_with_nonce(payload, inputs, outputs, signer, random_nonce())
    }

    /// Build a header with a caller-chosen nonce.
    pub fn build_with_nonce(
        &self,
        payload: &[u8],
        inputs: &[Address],
        outputs: &[Address],
        signer: &PublicKey,
        nonce: String,
    ) -> TransactionHeader {
        let signer_hex = signer.to_hex();
        TransactionHeader {
            batcher_pubkey: signer_hex.clone(),
            dependencies: Vec::new(),
            family_name: self.family_name.clone(),
            family_version: self.family_version.clone(),
            inputs: inputs.iter().map(|a| a.to_string()).collect(),
            nonce,
            outputs: outputs.iter().map(|a| a.to_string()).collect(),
            payload_encoding: self.payload_encoding.clone(),
            payload_sha512: PayloadHasher::hash_hex(payload),
            signer_pubkey: signer_hex,
        }
    }

    /// Validate `object`, wrap it in its action's payload envelope, and sign
    /// a transaction that reads its own address plus every referenced
    /// entity and writes only its own address.
    pub fn for_object<T: OmiObject>(
        &self,
        object: &T,
        key: &SigningKey,
    ) -> ProtocolResult<SignedTransaction> {
        object.validate()?;
        let own = object.address();
        let payload = PayloadCodec::payload_for(object);
        let mut inputs = vec![own.clone()];
        inputs.extend(object.references().into_iter().filter(|a| *a != own));
        let outputs = [own];
        debug!(
            kind = T::KIND.name(),
            key = object.natural_key(),
            references = inputs.len() - 1,
            "building transaction"
        );
        let header = self.build(&payload, &inputs, &outputs, &key.public_key());
        Self::sign(header, payload, key)
    }

    /// Serialize and sign `header`, pairing it with the payload it commits to.
    pub fn sign(
        header: TransactionHeader,
        payload: Vec<u8>,
        key: &SigningKey,
    ) -> ProtocolResult<SignedTransaction> {
        if !PayloadHasher::verify(&payload, &header.payload_sha512) {
            return Err(ProtocolError::DigestMismatch(
                "payload does not match header digest".into(),
            ));
        }
        let header_bytes = header.encode_to_vec();
        let signature = key.sign(&header_bytes)?;
        debug!(
            txn_id = %signature.to_hex(),
            inputs = header.inputs.len(),
            outputs = header.outputs.len(),
            "signed transaction"
        );
        Ok(SignedTransaction {
            header,
            header_bytes,
            signature,
            payload,
        })
    }
}

/// A transaction header together with its signature and payload.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    header: TransactionHeader,
    header_bytes: Vec<u8>,
    signature: Signature,
    payload: Vec<u8>,
}

impl SignedTransaction {
    /// Transaction id: hex of the header signature.
    pub fn id(&self) -> String {
        self.signature.to_hex()
    }

    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    /// The exact bytes that were signed.
    pub fn header_bytes(&self) -> &[u8] {
        &self.header_bytes
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Re-check the signature and payload digest the way a validator would.
    pub fn verify(&self) -> ProtocolResult<()> {
        let header = TransactionHeader::decode(self.header_bytes.as_slice())
            .map_err(|e| ProtocolError::decoding("transaction header", e))?;
        PublicKey::from_hex(&header.signer_pubkey)?.verify(&self.header_bytes, &self.signature)?;
        if !PayloadHasher::verify(&self.payload, &header.payload_sha512) {
            return Err(ProtocolError::DigestMismatch(format!("transaction {}", self.id())));
        }
        Ok(())
    }

    pub fn to_wire(&self) -> Transaction {
        Transaction {
            header: self.header_bytes.clone(),
            header_signature: self.id(),
            payload: self.payload.clone(),
        }
    }
}

/// Wraps signed transactions into a signed batch.
pub struct BatchBuilder;

impl BatchBuilder {
    /// Batch header listing the transaction ids in execution order.
    pub fn build(transactions: &[SignedTransaction], signer: &PublicKey) -> BatchHeader {
        BatchHeader {
            signer_pubkey: signer.to_hex(),
            transaction_ids: transactions.iter().map(SignedTransaction::id).collect(),
        }
    }

    /// Sign `header`. The transactions must be exactly the ones it lists, in
    /// the same order.
    pub fn sign(
        header: BatchHeader,
        transactions: Vec<SignedTransaction>,
        key: &SigningKey,
    ) -> ProtocolResult<SignedBatch> {
        if transactions.is_empty() {
            return Err(ProtocolError::EmptyBatch);
        }
        let ids: Vec<String> = transactions.iter().map(SignedTransaction::id).collect();
        if ids != header.transaction_ids {
            return Err(ProtocolError::BatchMismatch(format!(
                "header lists {} ids, batch carries {} transactions in a different order or set",
                header.transaction_ids.len(),
                ids.len()
            )));
        }
        let header_bytes = header.encode_to_vec();
        let signature = key.sign(&header_bytes)?;
        debug!(
            batch_id = %signature.to_hex(),
            transactions = transactions.len(),
            "signed batch"
        );
        Ok(SignedBatch {
            header,
            header_bytes,
            signature,
            transactions,
        })
    }

    /// Build and sign a batch around a single transaction.
    pub fn single(transaction: SignedTransaction, key: &SigningKey) -> ProtocolResult<SignedBatch> {
        let transactions = vec![transaction];
        let header = Self::build(&transactions, &key.public_key());
        Self::sign(header, transactions, key)
    }
}

/// A signed batch ready for submission.
#[derive(Clone, Debug)]
pub struct SignedBatch {
    header: BatchHeader,
    header_bytes: Vec<u8>,
    signature: Signature,
    transactions: Vec<SignedTransaction>,
}

impl SignedBatch {
    /// Batch id: hex of the batch header signature.
    pub fn id(&self) -> String {
        self.signature.to_hex()
    }

    pub fn header(&self) -> &BatchHeader {
        &self.header
    }

    pub fn header_bytes(&self) -> &[u8] {
        &self.header_bytes
    }

    pub fn transactions(&self) -> &[SignedTransaction] {
        &self.transactions
    }

    pub fn verify(&self) -> ProtocolResult<()> {
        PublicKey::from_hex(&self.header.signer_pubkey)?
            .verify(&self.header_bytes, &self.signature)?;
        self.transactions.iter().try_for_each(SignedTransaction::verify)
    }

    pub fn to_wire(&self) -> Batch {
        Batch {
            header: self.header_bytes.clone(),
            header_signature: self.id(),
            transactions: self.transactions.iter().map(SignedTransaction::to_wire).collect(),
        }
    }

    /// Serialize as a one-batch list, the body the submission endpoint takes.
    pub fn to_batch_list_bytes(&self) -> Vec<u8> {
        BatchList {
            batches: vec![self.to_wire()],
        }
        .encode_to_vec()
    }
}
