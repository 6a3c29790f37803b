use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The closed set of entity kinds stored under the omi namespace.
///
/// Each kind owns a two-character address infix, so the addresses of
/// different kinds never share a prefix. Codec and address behavior is
/// selected by matching on the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Work,
    Recording,
    Individual,
    Organization,
}

impl ObjectKind {
    /// Every kind, in infix order.
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Work,
        ObjectKind::Recording,
        ObjectKind::Individual,
        ObjectKind::Organization,
    ];

    /// Address infix placed between the namespace prefix and the key hash.
    pub fn infix(&self) -> &'static str {
        match self {
            Self::Work => "00",
            Self::Recording => "01",
            Self::Individual => "02",
            Self::Organization => "03",
        }
    }

    /// Reverse of [`ObjectKind::infix`].
    pub fn from_infix(infix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.infix() == infix)
    }

    /// Lowercase name used in logs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Recording => "recording",
            Self::Individual => "individual",
            Self::Organization => "organization",
        }
    }

    /// Transaction action that writes an entity of this kind.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Work => "SetWork",
            Self::Recording => "SetRecording",
            Self::Individual => "SetIndividualIdentity",
            Self::Organization => "SetOrganizationalIdentity",
        }
    }

    /// Name of the field that holds the natural key.
    pub fn natural_key_field(&self) -> &'static str {
        match self {
            Self::Work | Self::Recording => "title",
            Self::Individual | Self::Organization => "name",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" | "works" => Ok(Self::Work),
            "recording" | "recordings" => Ok(Self::Recording),
            "individual" | "individuals" => Ok(Self::Individual),
            "organization" | "organizations" | "organisation" | "organisations" => {
                Ok(Self::Organization)
            }
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}
