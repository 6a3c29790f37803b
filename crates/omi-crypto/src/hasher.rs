use sha2::{Digest, Sha512};

/// SHA-512 digest carried in transaction headers.
///
/// The header commits to the payload through this digest rather than the
/// payload itself, so the ledger recomputes it over the exact payload bytes
/// it receives.
pub struct PayloadHasher;

impl PayloadHasher {
    /// Raw 64-byte digest.
    pub fn hash(data: &[u8]) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&Sha512::digest(data));
        out
    }

    /// Lowercase hex digest, the form placed in the header.
    pub fn hash_hex(data: &[u8]) -> String {
        hex::encode(Self::hash(data))
    }

    /// Verify that `data` hashes to `expected_hex`.
    pub fn verify(data: &[u8], expected_hex: &str) -> bool {
        Self::hash_hex(data).eq_ignore_ascii_case(expected_hex)
    }
}
