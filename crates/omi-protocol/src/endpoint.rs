use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Path segments of the ledger REST API.
pub mod endpoints {
    pub const STATE: &str = "/state";
    pub const BATCHES: &str = "/batches";
}

/// One page of `GET /state?address=..`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateListResponse {
    #[serde(default)]
    pub data: Vec<StateEntry>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub address: String,
    /// Base64 of the stored record bytes.
    pub data: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// `GET /state/{address}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateEntryResponse {
    pub data: String,
}

/// `POST /batches`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub link: String,
}

/// Batch status query: batch id -> status string.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl BatchStatusResponse {
    /// Status of `batch_id`; missing ids are [`CommitStatus::Unknown`].
    pub fn status_of(&self, batch_id: &str) -> CommitStatus {
        self.data
            .get(batch_id)
            .map(|s| s.parse().unwrap_or(CommitStatus::Unknown))
            .unwrap_or(CommitStatus::Unknown)
    }
}

/// Ledger-reported lifecycle state of a submitted batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitStatus {
    Pending,
    Committed,
    Invalid,
    Unknown,
}

impl CommitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Committed => "COMMITTED",
            Self::Invalid => "INVALID",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether the status can still change.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMMITTED" => Ok(Self::Committed),
            "INVALID" => Ok(Self::Invalid),
            "UNKNOWN" => Ok(Self::Unknown),
            other => Err(format!("unrecognized batch status {other}")),
        }
    }
}
