//! Domain records stored on the ledger.
//!
//! Field numbers are part of the ledger contract: the transaction processor
//! decodes the same schema, and the payload digest is taken over the encoded
//! bytes. Never renumber a field.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::TypeError;
use crate::kind::ObjectKind;

/// Behavior shared by every storable record.
pub trait OmiObject: prost::Message + Default + Clone + Sized {
    const KIND: ObjectKind;

    /// The unique name or title the address is derived from.
    fn natural_key(&self) -> &str;

    /// Addresses of the other entities this record points at.
    fn references(&self) -> Vec<Address>;

    /// Record `public_key` as the identity that registered this entity.
    fn stamp_signer(&mut self, public_key: &str);

    fn into_domain(self) -> DomainObject;

    fn address(&self) -> Address {
        Address::derive(self.natural_key(), Self::KIND)
    }

    fn validate(&self) -> Result<(), TypeError> {
        if self.natural_key().is_empty() {
            return Err(TypeError::EmptyNaturalKey {
                kind: Self::KIND.name(),
            });
        }
        Ok(())
    }
}

fn check_split(name: &str, split: u32) -> Result<(), TypeError> {
    if split > 100 {
        return Err(TypeError::InvalidSplit {
            name: name.to_string(),
            split,
        });
    }
    Ok(())
}

/// Collects reference addresses, skipping blank names and repeats.
#[derive(Default)]
struct References(Vec<Address>);

impl References {
    fn push(&mut self, name: &str, kind: ObjectKind) {
        if name.is_empty() {
            return;
        }
        let address = Address::derive(name, kind);
        if !self.0.contains(&address) {
            self.0.push(address);
        }
    }
}

// ---- Identities ----

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct IndividualIdentity {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub pubkey: String,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum OrganizationType {
    UnsetType = 0,
    Label = 1,
    Publisher = 2,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct OrganizationalIdentity {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub pubkey: String,
    #[prost(enumeration = "OrganizationType", tag = "3")]
    pub organization_type: i32,
}

impl IndividualIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl OrganizationalIdentity {
    pub fn new(name: impl Into<String>, organization_type: OrganizationType) -> Self {
        Self {
            name: name.into(),
            pubkey: String::new(),
            organization_type: organization_type as i32,
        }
    }
}

impl OmiObject for IndividualIdentity {
    const KIND: ObjectKind = ObjectKind::Individual;

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn references(&self) -> Vec<Address> {
        Vec::new()
    }

    fn stamp_signer(&mut self, public_key: &str) {
        self.pubkey = public_key.to_string();
    }

    fn into_domain(self) -> DomainObject {
        DomainObject::Individual(self)
    }
}

impl OmiObject for OrganizationalIdentity {
    const KIND: ObjectKind = ObjectKind::Organization;

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn references(&self) -> Vec<Address> {
        Vec::new()
    }

    fn stamp_signer(&mut self, public_key: &str) {
        self.pubkey = public_key.to_string();
    }

    fn into_domain(self) -> DomainObject {
        DomainObject::Organization(self)
    }
}

// ---- Recordings ----

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct ContributorSplit {
    #[prost(string, tag = "1")]
    pub contributor_name: String,
    #[prost(uint32, tag = "2")]
    pub split: u32,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct DerivedWorkSplit {
    #[prost(string, tag = "1")]
    pub work_name: String,
    #[prost(uint32, tag = "2")]
    pub split: u32,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct DerivedRecordingSplit {
    #[prost(string, tag = "1")]
    pub recording_name: String,
    #[prost(uint32, tag = "2")]
    pub split: u32,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct Recording {
    #[prost(string, tag = "1")]
    pub title: String,
    #[prost(string, tag = "2")]
    pub registering_pubkey: String,
    #[prost(string, tag = "3")]
    #[serde(alias = "ISRC")]
    pub isrc: String,
    #[prost(string, tag = "4")]
    pub label_name: String,
    #[prost(message, repeated, tag = "5")]
    pub contributor_splits: Vec<ContributorSplit>,
    #[prost(uint32, tag = "6")]
    pub overall_split: u32,
    #[prost(message, repeated, tag = "7")]
    pub derived_work_splits: Vec<DerivedWorkSplit>,
    #[prost(message, repeated, tag = "8")]
    pub derived_recording_splits: Vec<DerivedRecordingSplit>,
}

impl Recording {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label_name: impl Into<String>) -> Self {
        self.label_name = label_name.into();
        self
    }

    pub fn with_contributor(mut self, contributor_name: impl Into<String>, split: u32) -> Self {
        self.contributor_splits.push(ContributorSplit {
            contributor_name: contributor_name.into(),
            split,
        });
        self
    }

    pub fn with_derived_work(mut self, work_name: impl Into<String>, split: u32) -> Self {
        self.derived_work_splits.push(DerivedWorkSplit {
            work_name: work_name.into(),
            split,
        });
        self
    }

    pub fn with_derived_recording(mut self, recording_name: impl Into<String>, split: u32) -> Self {
        self.derived_recording_splits.push(DerivedRecordingSplit {
            recording_name: recording_name.into(),
            split,
        });
        self
    }
}

impl OmiObject for Recording {
    const KIND: ObjectKind = ObjectKind::Recording;

    fn natural_key(&self) -> &str {
        &self.title
    }

    fn references(&self) -> Vec<Address> {
        let mut refs = References::default();
        refs.push(&self.label_name, ObjectKind::Organization);
        for split in &self.contributor_splits {
            refs.push(&split.contributor_name, ObjectKind::Individual);
        }
        for split in &self.derived_work_splits {
            refs.push(&split.work_name, ObjectKind::Work);
        }
        for split in &self.derived_recording_splits {
            refs.push(&split.recording_name, ObjectKind::Recording);
        }
        refs.0
    }

    fn stamp_signer(&mut self, public_key: &str) {
        self.registering_pubkey = public_key.to_string();
    }

    fn into_domain(self) -> DomainObject {
        DomainObject::Recording(self)
    }

    fn validate(&self) -> Result<(), TypeError> {
        if self.title.is_empty() {
            return Err(TypeError::EmptyNaturalKey {
                kind: Self::KIND.name(),
            });
        }
        check_split(&self.title, self.overall_split)?;
        for split in &self.contributor_splits {
            check_split(&split.contributor_name, split.split)?;
        }
        for split in &self.derived_work_splits {
            check_split(&split.work_name, split.split)?;
        }
        for split in &self.derived_recording_splits {
            check_split(&split.recording_name, split.split)?;
        }
        Ok(())
    }
}

// ---- Works ----

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct SongwriterPublisher {
    #[prost(string, tag = "1")]
    pub songwriter_name: String,
    #[prost(string, tag = "2")]
    pub publisher_name: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct SongwriterPublisherSplit {
    #[prost(message, optional, tag = "1")]
    pub songwriter_publisher: Option<SongwriterPublisher>,
    #[prost(uint32, tag = "2")]
    pub split: u32,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
#[serde(default)]
pub struct Work {
    #[prost(string, tag = "1")]
    pub title: String,
    #[prost(string, tag = "2")]
    pub registering_pubkey: String,
    #[prost(string, tag = "3")]
    #[serde(alias = "ISWC")]
    pub iswc: String,
    #[prost(message, repeated, tag = "4")]
    pub songwriter_publisher_splits: Vec<SongwriterPublisherSplit>,
}

impl Work {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_split(
        mut self,
        songwriter_name: impl Into<String>,
        publisher_name: impl Into<String>,
        split: u32,
    ) -> Self {
        self.songwriter_publisher_splits.push(SongwriterPublisherSplit {
            songwriter_publisher: Some(SongwriterPublisher {
                songwriter_name: songwriter_name.into(),
                publisher_name: publisher_name.into(),
            }),
            split,
        });
        self
    }
}

impl OmiObject for Work {
    const KIND: ObjectKind = ObjectKind::Work;

    fn natural_key(&self) -> &str {
        &self.title
    }

    fn references(&self) -> Vec<Address> {
        let mut refs = References::default();
        for pair in self
            .songwriter_publisher_splits
            .iter()
            .filter_map(|split| split.songwriter_publisher.as_ref())
        {
            refs.push(&pair.songwriter_name, ObjectKind::Individual);
            refs.push(&pair.publisher_name, ObjectKind::Organization);
        }
        refs.0
    }

    fn stamp_signer(&mut self, public_key: &str) {
        self.registering_pubkey = public_key.to_string();
    }

    fn into_domain(self) -> DomainObject {
        DomainObject::Work(self)
    }

    fn validate(&self) -> Result<(), TypeError> {
        if self.title.is_empty() {
            return Err(TypeError::EmptyNaturalKey {
                kind: Self::KIND.name(),
            });
        }
        for split in &self.songwriter_publisher_splits {
            let name = split
                .songwriter_publisher
                .as_ref()
                .map(|p| p.songwriter_name.as_str())
                .unwrap_or(self.title.as_str());
            check_split(name, split.split)?;
        }
        Ok(())
    }
}

// ---- Tagged union ----

/// Any record the ledger can hold, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum DomainObject {
    Individual(IndividualIdentity),
    Organization(OrganizationalIdentity),
    Recording(Recording),
    Work(Work),
}

impl DomainObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Individual(_) => ObjectKind::Individual,
            Self::Organization(_) => ObjectKind::Organization,
            Self::Recording(_) => ObjectKind::Recording,
            Self::Work(_) => ObjectKind::Work,
        }
    }

    pub fn natural_key(&self) -> &str {
        match self {
            Self::Individual(o) => o.natural_key(),
            Self::Organization(o) => o.natural_key(),
            Self::Recording(o) => o.natural_key(),
            Self::Work(o) => o.natural_key(),
        }
    }

    pub fn address(&self) -> Address {
        Address::derive(self.natural_key(), self.kind())
    }

    pub fn references(&self) -> Vec<Address> {
        match self {
            Self::Individual(o) => o.references(),
            Self::Organization(o) => o.references(),
            Self::Recording(o) => o.references(),
            Self::Work(o) => o.references(),
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        match self {
            Self::Individual(o) => o.validate(),
            Self::Organization(o) => o.validate(),
            Self::Recording(o) => o.validate(),
            Self::Work(o) => o.validate(),
        }
    }
}

impl From<IndividualIdentity> for DomainObject {
    fn from(value: IndividualIdentity) -> Self {
        Self::Individual(value)
    }
}

impl From<OrganizationalIdentity> for DomainObject {
    fn from(value: OrganizationalIdentity) -> Self {
        Self::Organization(value)
    }
}

impl From<Recording> for DomainObject {
    fn from(value: Recording) -> Self {
        Self::Recording(value)
    }
}

impl From<Work> for DomainObject {
    fn from(value: Work) -> Self {
        Self::Work(value)
    }
}
