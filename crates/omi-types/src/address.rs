use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::error::TypeError;
use crate::kind::ObjectKind;

/// Transaction family that owns the omi namespace.
pub const FAMILY_NAME: &str = "omi";

/// Length of a full state address in hex characters.
pub const ADDRESS_LENGTH: usize = 70;

/// Length of the family namespace prefix in hex characters.
pub const NAMESPACE_LENGTH: usize = 6;

const INFIX_LENGTH: usize = 2;
const KEY_HASH_LENGTH: usize = ADDRESS_LENGTH - NAMESPACE_LENGTH - INFIX_LENGTH;

fn sha512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

/// The six-character namespace prefix shared by every omi address.
pub fn namespace() -> String {
    let mut digest = sha512_hex(FAMILY_NAME.as_bytes());
    digest.truncate(NAMESPACE_LENGTH);
    digest
}

/// Deterministic state address of an entity.
///
/// `namespace || kind infix || last 62 hex chars of SHA-512(natural key)`.
/// The same key and kind always produce the same address; distinct kinds
/// land in disjoint prefix ranges.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Derive the address of the entity `natural_key` of the given kind.
    pub fn derive(natural_key: &str, kind: ObjectKind) -> Self {
        let digest = sha512_hex(natural_key.as_bytes());
        let mut address = AddressPrefix::for_kind(kind).0;
        address.push_str(&digest[digest.len() - KEY_HASH_LENGTH..]);
        Self(address)
    }

    /// Parse a full address, checking length, alphabet and namespace.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != ADDRESS_LENGTH {
            return Err(TypeError::InvalidLength {
                expected: ADDRESS_LENGTH,
                actual: s.len(),
            });
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TypeError::InvalidHex(s.to_string()));
        }
        if s[..NAMESPACE_LENGTH] != namespace() {
            return Err(TypeError::ForeignAddress(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// The kind encoded in this address' infix, if it is a known one.
    pub fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_infix(&self.0[NAMESPACE_LENGTH..NAMESPACE_LENGTH + INFIX_LENGTH])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}..)", &self.0[..NAMESPACE_LENGTH + INFIX_LENGTH + 8])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Namespace plus kind infix; scopes a state listing to one kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AddressPrefix(String);

impl AddressPrefix {
    pub fn for_kind(kind: ObjectKind) -> Self {
        let mut prefix = namespace();
        prefix.push_str(kind.infix());
        Self(prefix)
    }

    /// Returns `true` if `address` falls inside this prefix range.
    pub fn contains(&self, address: &Address) -> bool {
        address.as_str().starts_with(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
