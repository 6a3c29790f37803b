use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::sync::Arc;

use base64::Engine;
use omi_protocol::{PayloadCodec, StateEntry, StateListResponse};
use omi_types::OmiObject;
use tracing::{debug, trace};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::transport::LedgerTransport;

/// Lazily pages through a state listing, yielding decoded records.
///
/// Each page is fetched only when the previous one is exhausted, so a
/// caller that stops early never pays for the rest. Once the ledger stops
/// returning a `paging.next` link and the buffer drains, the cursor is
/// finished for good.
///
/// A failed page fetch is yielded as an `Err` and leaves the locator in
/// place; calling `next` again retries the same page.
pub struct Cursor<T> {
    transport: Arc<dyn LedgerTransport>,
    next: Option<String>,
    buffer: VecDeque<StateEntry>,
    pages_fetched: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T: OmiObject> Cursor<T> {
    /// Start a cursor at `endpoint`. `count` is added as the page size
    /// unless the URL already names one.
    pub fn new(
        transport: Arc<dyn LedgerTransport>,
        endpoint: &str,
        count: usize,
    ) -> ClientResult<Self> {
        let mut url = Url::parse(endpoint)
            .map_err(|e| ClientError::Config(format!("invalid listing url {endpoint}: {e}")))?;
        if !url.query_pairs().any(|(k, _)| k == "count") {
            url.query_pairs_mut().append_pair("count", &count.to_string());
        }
        Ok(Self {
            transport,
            next: Some(url.into()),
            buffer: VecDeque::new(),
            pages_fetched: 0,
            _record: PhantomData,
        })
    }

    /// Pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// True once every page has been fetched and consumed.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none() && self.buffer.is_empty()
    }

    fn fetch_page(&mut self, url: &str) -> ClientResult<()> {
        let response = self.transport.get(url)?.error_for_status(url)?;
        let page: StateListResponse = response.json(url)?;
        self.pages_fetched += 1;
        debug!(
            kind = T::KIND.name(),
            page = self.pages_fetched,
            entries = page.data.len(),
            more = page.paging.next.is_some(),
            "fetched state page"
        );
        self.buffer.extend(page.data);
        self.next = page.paging.next;
        Ok(())
    }

    fn decode(entry: StateEntry) -> ClientResult<T> {
        trace!(address = %entry.address, "decoding state entry");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(entry.data.as_bytes())
            .map_err(|e| ClientError::Decoding(format!("state at {}: {e}", entry.address)))?;
        Ok(PayloadCodec::decode_as::<T>(&bytes)?)
    }

    fn advance(&mut self) -> Option<ClientResult<T>> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Some(Self::decode(entry));
            }
            let url = self.next.clone()?;
            if let Err(err) = self.fetch_page(&url) {
                return Some(Err(err));
            }
        }
    }
}

impl<T: OmiObject> Iterator for Cursor<T> {
    type Item = ClientResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl<T: OmiObject> FusedIterator for Cursor<T> {}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("next", &self.next)
            .field("buffered", &self.buffer.len())
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}
