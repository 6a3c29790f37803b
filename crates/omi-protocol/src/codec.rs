use omi_types::{
    DomainObject, IndividualIdentity, ObjectKind, OmiObject, OrganizationalIdentity, Recording,
    Work,
};
use prost::Message;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::OmiTransactionPayload;

/// Canonical binary codec for domain records and the transaction payload
/// envelope.
///
/// Fields are emitted in tag order and default-valued scalars are omitted,
/// so the same logical record always encodes to the same bytes.
pub struct PayloadCodec;

impl PayloadCodec {
    /// Encode any record.
    pub fn encode(object: &DomainObject) -> Vec<u8> {
        match object {
            DomainObject::Individual(o) => o.encode_to_vec(),
            DomainObject::Organization(o) => o.encode_to_vec(),
            DomainObject::Recording(o) => o.encode_to_vec(),
            DomainObject::Work(o) => o.encode_to_vec(),
        }
    }

    /// Encode a record of a statically known kind.
    pub fn encode_object<T: OmiObject>(object: &T) -> Vec<u8> {
        object.encode_to_vec()
    }

    /// Decode bytes as a record of `kind`.
    pub fn decode(bytes: &[u8], kind: ObjectKind) -> ProtocolResult<DomainObject> {
        Ok(match kind {
            ObjectKind::Individual => Self::decode_as::<IndividualIdentity>(bytes)?.into(),
            ObjectKind::Organization => Self::decode_as::<OrganizationalIdentity>(bytes)?.into(),
            ObjectKind::Recording => Self::decode_as::<Recording>(bytes)?.into(),
            ObjectKind::Work => Self::decode_as::<Work>(bytes)?.into(),
        })
    }

    /// Decode bytes as a record of type `T`.
    pub fn decode_as<T: OmiObject>(bytes: &[u8]) -> ProtocolResult<T> {
        T::decode(bytes).map_err(|e| ProtocolError::decoding(T::KIND.name(), e))
    }

    /// Wrap an encoded record in the payload envelope for `action`.
    pub fn encode_payload(action: &str, data: Vec<u8>) -> Vec<u8> {
        OmiTransactionPayload {
            action: action.to_string(),
            data,
        }
        .encode_to_vec()
    }

    /// Build the payload envelope for a record: its kind's action plus the
    /// encoded record.
    pub fn payload_for<T: OmiObject>(object: &T) -> Vec<u8> {
        Self::encode_payload(T::KIND.action(), Self::encode_object(object))
    }

    pub fn decode_payload(bytes: &[u8]) -> ProtocolResult<OmiTransactionPayload> {
        OmiTransactionPayload::decode(bytes)
            .map_err(|e| ProtocolError::decoding("transaction payload", e))
    }

    /// Decode a payload envelope and the record inside it.
    pub fn decode_payload_object(bytes: &[u8]) -> ProtocolResult<DomainObject> {
        let payload = Self::decode_payload(bytes)?;
        let kind = ObjectKind::ALL
            .into_iter()
            .find(|kind| kind.action() == payload.action)
            .ok_or_else(|| {
                ProtocolError::decoding("transaction payload", format!("unknown action {}", payload.action))
            })?;
        Self::decode(&payload.data, kind)
    }
}
