//! Cryptographic primitives for the OMI ledger client.
//!
//! Provides the SHA-512 payload digest carried in transaction headers and
//! secp256k1 ECDSA signing/verification for transaction and batch headers.
//!
//! All crypto operations wrap established libraries.

pub mod hasher;
pub mod signer;

pub use hasher::PayloadHasher;
pub use signer::{PublicKey, Signature, SignatureError, SigningKey};
