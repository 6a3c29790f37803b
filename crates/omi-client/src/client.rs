use std::sync::Arc;

use base64::Engine;
use omi_crypto::{PublicKey, SigningKey};
use omi_protocol::{endpoints, BatchBuilder, PayloadCodec, StateEntryResponse, TransactionBuilder};
use omi_types::{
    Address, AddressPrefix, DomainObject, IndividualIdentity, ObjectKind, OmiObject,
    OrganizationalIdentity, Recording, Work,
};
use tracing::debug;

use crate::config::ClientConfig;
use crate::cursor::Cursor;
use crate::error::{ClientError, ClientResult};
use crate::status::BatchStatus;
use crate::submit::Submitter;
use crate::transport::{HttpTransport, LedgerTransport};

/// Kind-erased listing over any record type.
pub type ObjectIter = Box<dyn Iterator<Item = ClientResult<DomainObject>> + Send>;

/// Reads and writes OMI records on one ledger with one signing identity.
///
/// A client built without a private key can read but every `set*` fails
/// with [`ClientError::Config`].
pub struct OmiClient {
    config: ClientConfig,
    key: Option<SigningKey>,
    transport: Arc<dyn LedgerTransport>,
    builder: TransactionBuilder,
    submitter: Submitter,
}

impl OmiClient {
    /// Connect over HTTP using `config`.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn LedgerTransport>,
    ) -> ClientResult<Self> {
        config.validate()?;
        let key = if config.private_key.trim().is_empty() {
            None
        } else {
            Some(config.signing_key()?)
        };
        let submitter = Submitter::new(
            transport.clone(),
            config.base_url(),
            config.poll_interval(),
        );
        debug!(url = config.base_url(), read_only = key.is_none(), "ledger client ready");
        Ok(Self {
            config,
            key,
            transport,
            builder: TransactionBuilder::default(),
            submitter,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn public_key(&self) -> Option<PublicKey> {
        self.key.as_ref().map(SigningKey::public_key)
    }

    fn signer(&self) -> ClientResult<&SigningKey> {
        self.key
            .as_ref()
            .ok_or_else(|| ClientError::Config("no private key configured".into()))
    }

    /// Sign and submit `object` as a one-transaction batch.
    ///
    /// The signer's public key replaces whatever registering key the record
    /// carried.
    pub fn set<T: OmiObject>(&self, mut object: T) -> ClientResult<BatchStatus> {
        let key = self.signer()?;
        object.stamp_signer(&key.public_key().to_hex());
        let txn = self.builder.for_object(&object, key)?;
        let batch = BatchBuilder::single(txn, key)?;
        self.submitter.submit(&batch)
    }

    /// Fetch the record stored under `natural_key`.
    pub fn get<T: OmiObject>(&self, natural_key: &str) -> ClientResult<T> {
        let bytes = self.fetch_state(&Address::derive(natural_key, T::KIND))?;
        Ok(PayloadCodec::decode_as::<T>(&bytes)?)
    }

    /// Every record of type `T`, paged lazily.
    pub fn list<T: OmiObject>(&self) -> ClientResult<Cursor<T>> {
        let prefix = AddressPrefix::for_kind(T::KIND);
        let endpoint = format!(
            "{}{}?address={}",
            self.config.base_url(),
            endpoints::STATE,
            prefix.as_str()
        );
        Cursor::new(self.transport.clone(), &endpoint, self.config.cursor_count)
    }

    pub fn set_object(&self, object: DomainObject) -> ClientResult<BatchStatus> {
        match object {
            DomainObject::Individual(o) => self.set(o),
            DomainObject::Organization(o) => self.set(o),
            DomainObject::Recording(o) => self.set(o),
            DomainObject::Work(o) => self.set(o),
        }
    }

    pub fn get_object(&self, kind: ObjectKind, natural_key: &str) -> ClientResult<DomainObject> {
        let bytes = self.fetch_state(&Address::derive(natural_key, kind))?;
        Ok(PayloadCodec::decode(&bytes, kind)?)
    }

    pub fn list_objects(&self, kind: ObjectKind) -> ClientResult<ObjectIter> {
        fn erase<T: OmiObject + 'static>(cursor: Cursor<T>) -> ObjectIter {
            Box::new(cursor.map(|r| r.map(OmiObject::into_domain)))
        }
        Ok(match kind {
            ObjectKind::Individual => erase(self.list::<IndividualIdentity>()?),
            ObjectKind::Organization => erase(self.list::<OrganizationalIdentity>()?),
            ObjectKind::Recording => erase(self.list::<Recording>()?),
            ObjectKind::Work => erase(self.list::<Work>()?),
        })
    }

    fn fetch_state(&self, address: &Address) -> ClientResult<Vec<u8>> {
        let url = format!("{}{}/{}", self.config.base_url(), endpoints::STATE, address);
        let response = self.transport.get(&url)?;
        if response.status == 404 {
            debug!(%address, "no state at address");
            return Err(ClientError::NotFound {
                address: address.to_string(),
            });
        }
        let entry: StateEntryResponse = response.error_for_status(&url)?.json(&url)?;
        base64::engine::general_purpose::STANDARD
            .decode(entry.data.as_bytes())
            .map_err(|e| ClientError::Decoding(format!("state at {address}: {e}")))
    }

    // ---- Per-kind shorthands ----

    pub fn set_individual(&self, identity: IndividualIdentity) -> ClientResult<BatchStatus> {
        self.set(identity)
    }

    pub fn get_individual(&self, name: &str) -> ClientResult<IndividualIdentity> {
        self.get(name)
    }

    pub fn get_individuals(&self) -> ClientResult<Cursor<IndividualIdentity>> {
        self.list()
    }

    pub fn set_organization(
        &self,
        identity: OrganizationalIdentity,
    ) -> ClientResult<BatchStatus> {
        self.set(identity)
    }

    pub fn get_organization(&self, name: &str) -> ClientResult<OrganizationalIdentity> {
        self.get(name)
    }

    pub fn get_organizations(&self) -> ClientResult<Cursor<OrganizationalIdentity>> {
        self.list()
    }

    pub fn set_recording(&self, recording: Recording) -> ClientResult<BatchStatus> {
        self.set(recording)
    }

    pub fn get_recording(&self, title: &str) -> ClientResult<Recording> {
        self.get(title)
    }

    pub fn get_recordings(&self) -> ClientResult<Cursor<Recording>> {
        self.list()
    }

    pub fn set_work(&self, work: Work) -> ClientResult<BatchStatus> {
        self.set(work)
    }

    pub fn get_work(&self, title: &str) -> ClientResult<Work> {
        self.get(title)
    }

    pub fn get_works(&self) -> ClientResult<Cursor<Work>> {
        self.list()
    }
}

impl std::fmt::Debug for OmiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmiClient")
            .field("config", &self.config)
            .field("signer", &self.public_key().map(|k| k.to_hex()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{b64, state_page, status_body, ScriptedTransport};
    use omi_protocol::{BatchList, CommitStatus, OmiTransactionPayload, TransactionHeader};
    use omi_types::OrganizationType;
    use prost::Message;
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "http://ledger.test";

    fn client() -> (OmiClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());
        let mut config = ClientConfig::new(format!("{BASE}/"), SigningKey::generate().to_hex());
        config.poll_interval_ms = 0;
        let client = OmiClient::with_transport(config, transport.clone()).unwrap();
        (client, transport)
    }

    fn submitted_header(transport: &ScriptedTransport) -> (TransactionHeader, Vec<u8>) {
        let request = transport
            .requests()
            .into_iter()
            .find(|r| r.method == "POST")
            .unwrap();
        let list = BatchList::decode(request.body.as_slice()).unwrap();
        let txn = &list.batches[0].transactions[0];
        (
            TransactionHeader::decode(txn.header.as_slice()).unwrap(),
            txn.payload.clone(),
        )
    }

    #[test]
    fn keyless_client_reads_but_cannot_write() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = OmiClient::with_transport(ClientConfig::default(), transport.clone()).unwrap();
        assert!(client.public_key().is_none());
        let err = client.set_individual(IndividualIdentity::new("Ada")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert_eq!(transport.request_count(), 0);

        transport.push_ok(json!({ "data": b64(&IndividualIdentity::new("Ada")) }));
        assert_eq!(client.get_individual("Ada").unwrap().name, "Ada");
    }

    #[test]
    fn malformed_key_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        let config = ClientConfig::new(BASE, "zz");
        let err = OmiClient::with_transport(config, transport).unwrap_err();
        assert!(matches!(err, ClientError::Signing(_)));
    }

    #[test]
    fn recording_declares_self_and_references() {
        let (client, transport) = client();
        transport.push(202, json!({ "link": format!("{BASE}/batch_status?id=1") }));
        let recording = Recording::new("Song A")
            .with_label("Label X")
            .with_contributor("Alice", 50)
            .with_contributor("Bob", 50)
            .with_derived_work("Work W", 100);

        client.set_recording(recording.clone()).unwrap();

        let (header, _) = submitted_header(&transport);
        let own = Address::derive("Song A", ObjectKind::Recording).into_string();
        let expected_inputs = vec![
            own.clone(),
            Address::derive("Label X", ObjectKind::Organization).into_string(),
            Address::derive("Alice", ObjectKind::Individual).into_string(),
            Address::derive("Bob", ObjectKind::Individual).into_string(),
            Address::derive("Work W", ObjectKind::Work).into_string(),
        ];
        assert_eq!(header.inputs, expected_inputs);
        assert_eq!(header.outputs, vec![own]);
        assert_eq!(header.family_name, "omi");
        assert_eq!(header.signer_pubkey, client.public_key().unwrap().to_hex());
        assert_eq!(header.batcher_pubkey, header.signer_pubkey);
    }

    #[test]
    fn set_stamps_signer_into_record() {
        let (client, transport) = client();
        transport.push(202, json!({ "link": format!("{BASE}/batch_status?id=1") }));
        let mut identity = OrganizationalIdentity::new("Label X", OrganizationType::Label);
        identity.pubkey = "spoofed".into();
        client.set_organization(identity).unwrap();

        let (_, payload) = submitted_header(&transport);
        let envelope = OmiTransactionPayload::decode(payload.as_slice()).unwrap();
        assert_eq!(envelope.action, "SetOrganizationalIdentity");
        let stored = OrganizationalIdentity::decode(envelope.data.as_slice()).unwrap();
        assert_eq!(stored.pubkey, client.public_key().unwrap().to_hex());
        assert_eq!(stored.organization_type, OrganizationType::Label as i32);
    }

    #[test]
    fn set_then_wait() {
        let (client, transport) = client();
        transport.push(202, json!({ "link": format!("{BASE}/batch_status?id=1") }));
        let status = client.set_individual(IndividualIdentity::new("Ada")).unwrap();
        transport
            .push_ok(status_body(status.batch_id(), "PENDING"))
            .push_ok(status_body(status.batch_id(), "COMMITTED"));
        let outcome = status
            .wait_for_committed(Duration::from_secs(10), Duration::from_secs(1))
            .unwrap();
        assert_eq!(outcome, CommitStatus::Committed);
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn invalid_record_never_reaches_ledger() {
        let (client, transport) = client();
        let err = client.set_work(Work::new("")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRecord(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn get_decodes_state() {
        let (client, transport) = client();
        let work = Work::new("Work W").with_split("Alice", "Pub P", 100);
        transport.push_ok(json!({ "data": b64(&work) }));
        let fetched = client.get_work("Work W").unwrap();
        assert_eq!(fetched, work);
        let address = Address::derive("Work W", ObjectKind::Work);
        assert_eq!(transport.requests()[0].url, format!("{BASE}/state/{address}"));
    }

    #[test]
    fn get_missing_is_not_found() {
        let (client, transport) = client();
        transport.push(404, json!({ "error": { "code": 75 } }));
        let err = client.get_individual("Nobody").unwrap_err();
        assert!(err.is_not_found());
        let address = Address::derive("Nobody", ObjectKind::Individual).into_string();
        assert!(matches!(err, ClientError::NotFound { address: ref a } if *a == address));
    }

    #[test]
    fn get_server_error_is_transport() {
        let (client, transport) = client();
        transport.push(500, json!({}));
        let err = client.get_recording("Song A").unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn get_object_dispatches_on_kind() {
        let (client, transport) = client();
        let person = IndividualIdentity::new("Ada");
        transport.push_ok(json!({ "data": b64(&person) }));
        let object = client.get_object(ObjectKind::Individual, "Ada").unwrap();
        assert_eq!(object, DomainObject::Individual(person));
    }

    #[test]
    fn list_scopes_to_kind_prefix() {
        let (client, transport) = client();
        transport.push_ok(state_page(&[Recording::new("Song A")], None));
        let titles: Vec<String> = client
            .get_recordings()
            .unwrap()
            .map(|r| r.unwrap().title)
            .collect();
        assert_eq!(titles, vec!["Song A".to_string()]);
        let prefix = AddressPrefix::for_kind(ObjectKind::Recording);
        assert_eq!(
            transport.requests()[0].url,
            format!("{BASE}/state?address={}&count=100", prefix.as_str())
        );
    }

    #[test]
    fn list_objects_erases_kind() {
        let (client, transport) = client();
        transport.push_ok(state_page(&[Work::new("W1"), Work::new("W2")], None));
        let objects: Vec<DomainObject> = client
            .list_objects(ObjectKind::Work)
            .unwrap()
            .collect::<ClientResult<_>>()
            .unwrap();
        assert_eq!(objects.len(), 2);
        assert!(objects.iter().all(|o| o.kind() == ObjectKind::Work));
    }
}
