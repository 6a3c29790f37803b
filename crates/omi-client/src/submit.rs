use std::sync::Arc;
use std::time::Duration;

use omi_protocol::{endpoints, SignedBatch, SubmitResponse};
use tracing::info;

use crate::error::ClientResult;
use crate::status::BatchStatus;
use crate::transport::LedgerTransport;

const BATCH_CONTENT_TYPE: &str = "application/octet-stream";

/// Posts signed batches to the ledger.
///
/// The ledger only acknowledges receipt; the returned [`BatchStatus`] is
/// how callers learn whether the batch was committed.
#[derive(Clone)]
pub struct Submitter {
    transport: Arc<dyn LedgerTransport>,
    base_url: String,
    poll_interval: Duration,
}

impl Submitter {
    pub fn new(
        transport: Arc<dyn LedgerTransport>,
        base_url: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            poll_interval,
        }
    }

    pub fn submit(&self, batch: &SignedBatch) -> ClientResult<BatchStatus> {
        let url = format!("{}{}", self.base_url, endpoints::BATCHES);
        let body = batch.to_batch_list_bytes();
        let response = self
            .transport
            .post(&url, BATCH_CONTENT_TYPE, body)?
            .error_for_status(&url)?;
        let accepted: SubmitResponse = response.json(&url)?;
        let batch_id = batch.id();
        info!(
            batch_id = %batch_id,
            transactions = batch.transactions().len(),
            link = %accepted.link,
            "batch submitted"
        );
        Ok(BatchStatus::new(
            self.transport.clone(),
            batch_id,
            accepted.link,
            self.poll_interval,
        ))
    }
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submitter")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
