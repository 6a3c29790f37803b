//! Foundation types for the OMI ledger client.
//!
//! Every other omi crate depends on `omi-types`. It defines the closed set
//! of entity kinds, the deterministic address scheme that places each
//! entity in ledger state, and the typed records that get encoded into
//! transaction payloads.
//!
//! # Key Types
//!
//! - [`ObjectKind`]: entity type tag, selects address infix and action
//! - [`Address`]: 70-hex-char state address derived from (natural key, kind)
//! - [`AddressPrefix`]: namespace + infix, scopes listings to one kind
//! - [`DomainObject`]: tagged union over the four record types
//! - [`OmiObject`]: behavior shared by every record type

pub mod address;
pub mod entity;
pub mod error;
pub mod kind;

pub use address::{namespace, Address, AddressPrefix, ADDRESS_LENGTH, FAMILY_NAME};
pub use entity::{
    ContributorSplit, DerivedRecordingSplit, DerivedWorkSplit, DomainObject, IndividualIdentity,
    OmiObject, OrganizationType, OrganizationalIdentity, Recording, SongwriterPublisher,
    SongwriterPublisherSplit, Work,
};
pub use error::TypeError;
pub use kind::ObjectKind;
