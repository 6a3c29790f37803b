//! Client for the OMI music-rights ledger.
//!
//! [`OmiClient`] is the entry point: it signs records with one secp256k1
//! identity, submits them as batches, and reads state back by natural key
//! or by listing everything of one kind.
//!
//! ```no_run
//! use omi_client::{ClientConfig, OmiClient};
//! use omi_types::IndividualIdentity;
//!
//! # fn main() -> omi_client::ClientResult<()> {
//! let config = ClientConfig::load("omi.toml")?;
//! let client = OmiClient::new(config.clone())?;
//! let status = client.set_individual(IndividualIdentity::new("Ada"))?;
//! let outcome = status.wait_for_committed(config.wait_timeout(), config.check_timeout())?;
//! println!("{} {}", status.batch_id(), outcome);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod status;
pub mod submit;
pub mod transport;

#[cfg(test)]
mod mock;

pub use client::{ObjectIter, OmiClient};
pub use config::ClientConfig;
pub use cursor::Cursor;
pub use error::{ClientError, ClientResult};
pub use status::BatchStatus;
pub use submit::Submitter;
pub use transport::{HttpResponse, HttpTransport, LedgerTransport};

pub use omi_protocol::CommitStatus;
