use k256::ecdsa::signature::{Signer, Verifier};

/// secp256k1 signing key (private).
///
/// Signatures are ECDSA over SHA-256 of the message, with RFC 6979
/// deterministic nonces and low-S normalization.
#[derive(Clone)]
pub struct SigningKey(k256::ecdsa::SigningKey);

/// secp256k1 public key, rendered in SEC1 compressed form.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(k256::ecdsa::VerifyingKey);

/// Compact 64-byte `r || s` ECDSA signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(k256::ecdsa::Signature);

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        Self(k256::ecdsa::SigningKey::random(&mut rand::thread_rng()))
    }

    /// Create from a raw 32-byte secret scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != 32 {
            return Err(SignatureError::InvalidKey(format!(
                "expected 32 secret bytes, got {}",
                bytes.len()
            )));
        }
        k256::ecdsa::SigningKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidKey("scalar out of range".into()))
    }

    /// Parse a 64-character hex secret.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| SignatureError::InvalidKey(format!("not hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// The corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(*self.0.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, SignatureError> {
        self.0
            .try_sign(message)
            .map(Signature)
            .map_err(|e| SignatureError::SigningFailed(e.to_string()))
    }

    /// Hex-encoded secret, for key files.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }
}

impl PublicKey {
    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.0
            .verify(message, &signature.0)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    /// 33-byte SEC1 compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Hex of the compressed encoding, the form carried in headers.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse a SEC1 encoded key (compressed or uncompressed) from hex.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(s)
            .map_err(|e| SignatureError::InvalidKey(format!("not hex: {e}")))?;
        k256::ecdsa::VerifyingKey::from_sec1_bytes(&bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidKey("not a curve point".into()))
    }
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&self.0.to_bytes());
        out
    }

    /// Lowercase hex of the compact form. Doubles as transaction/batch id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(s).map_err(|_| SignatureError::InvalidSignature)?;
        k256::ecdsa::Signature::from_slice(&bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidSignature)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.to_bytes()[..8]))
    }
}

/// Errors from signing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    #[error("signing failed: {0}")]
    SigningFailed(String),
}
