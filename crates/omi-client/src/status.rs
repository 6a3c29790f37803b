use std::sync::Arc;
use std::time::{Duration, Instant};

use omi_protocol::{BatchStatusResponse, CommitStatus};
use tracing::debug;

use crate::error::ClientResult;
use crate::transport::LedgerTransport;

/// Handle to a submitted batch for querying its commit status.
///
/// Holds the batch id and the status link the ledger returned on
/// submission. Nothing is persisted; drop the handle once the outcome
/// is known.
#[derive(Clone)]
pub struct BatchStatus {
    transport: Arc<dyn LedgerTransport>,
    batch_id: String,
    link: String,
    poll_interval: Duration,
}

impl BatchStatus {
    pub fn new(
        transport: Arc<dyn LedgerTransport>,
        batch_id: impl Into<String>,
        link: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            transport,
            batch_id: batch_id.into(),
            link: link.into(),
            poll_interval,
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    fn check_url(&self, wait: Duration) -> String {
        let sep = if self.link.contains('?') { '&' } else { '?' };
        format!("{}{}wait={}", self.link, sep, wait.as_secs())
    }

    /// One status query, asking the ledger to hold the response up to
    /// `wait` for the batch to settle.
    pub fn check(&self, wait: Duration) -> ClientResult<CommitStatus> {
        let url = self.check_url(wait);
        let response = self.transport.get(&url)?.error_for_status(&url)?;
        let body: BatchStatusResponse = response.json(&url)?;
        let status = body.status_of(&self.batch_id);
        debug!(batch_id = %self.batch_id, %status, "checked batch status");
        Ok(status)
    }

    /// Poll until the batch leaves `PENDING` or `timeout` elapses.
    ///
    /// Returns the first non-pending status seen, or the last observed
    /// status (`PENDING`) once the deadline passes. Sleeps between checks
    /// but never past the deadline.
    pub fn wait_for_committed(
        &self,
        timeout: Duration,
        check_timeout: Duration,
    ) -> ClientResult<CommitStatus> {
        let start = Instant::now();
        let mut checks = 0u32;
        loop {
            let status = self.check(check_timeout)?;
            checks += 1;
            if !status.is_pending() {
                debug!(batch_id = %self.batch_id, %status, checks, "batch settled");
                return Ok(status);
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                debug!(batch_id = %self.batch_id, checks, "timed out waiting for commit");
                return Ok(status);
            }
            std::thread::sleep(self.poll_interval.min(timeout - elapsed));
        }
    }
}

impl std::fmt::Debug for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchStatus")
            .field("batch_id", &self.batch_id)
            .field("link", &self.link)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::mock::{status_body, ScriptedTransport};

    const LINK: &str = "http://ledger.test/batch_status?id=abc";

    fn handle(transport: &Arc<ScriptedTransport>) -> BatchStatus {
        BatchStatus::new(transport.clone(), "abc", LINK, Duration::ZERO)
    }

    #[test]
    fn check_appends_wait_hint() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(status_body("abc", "COMMITTED"));
        let status = handle(&transport).check(Duration::from_secs(5)).unwrap();
        assert_eq!(status, CommitStatus::Committed);
        assert_eq!(transport.requests()[0].url, format!("{LINK}&wait=5"));
    }

    #[test]
    fn check_url_without_query() {
        let transport = Arc::new(ScriptedTransport::new());
        let status = BatchStatus::new(transport, "abc", "http://ledger.test/s", Duration::ZERO);
        assert_eq!(status.check_url(Duration::from_secs(2)), "http://ledger.test/s?wait=2");
    }

    #[test]
    fn missing_batch_id_is_unknown() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(status_body("other", "COMMITTED"));
        assert_eq!(
            handle(&transport).check(Duration::ZERO).unwrap(),
            CommitStatus::Unknown
        );
    }

    #[test]
    fn check_surfaces_transport_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(503, serde_json::json!({}));
        let err = handle(&transport).check(Duration::ZERO).unwrap_err();
        assert!(matches!(err, ClientError::Transport { status: 503, .. }));
    }

    #[test]
    fn waits_through_pending_until_committed() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_ok(status_body("abc", "PENDING"))
            .push_ok(status_body("abc", "PENDING"))
            .push_ok(status_body("abc", "COMMITTED"));
        let status = handle(&transport)
            .wait_for_committed(Duration::from_secs(60), Duration::from_secs(1))
            .unwrap();
        assert_eq!(status, CommitStatus::Committed);
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn returns_pending_when_deadline_passes() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_ok(status_body("abc", "PENDING"))
            .push_ok(status_body("abc", "PENDING"))
            .push_ok(status_body("abc", "COMMITTED"));
        let status = handle(&transport)
            .wait_for_committed(Duration::ZERO, Duration::from_secs(1))
            .unwrap();
        assert_eq!(status, CommitStatus::Pending);
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn deadline_bounds_sleeping() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..100 {
            transport.push_ok(status_body("abc", "PENDING"));
        }
        let status = BatchStatus::new(transport.clone(), "abc", LINK, Duration::from_millis(20));
        let started = Instant::now();
        let result = status
            .wait_for_committed(Duration::from_millis(50), Duration::ZERO)
            .unwrap();
        assert_eq!(result, CommitStatus::Pending);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(transport.request_count() >= 2);
        assert!(transport.request_count() < 100);
    }

    #[test]
    fn invalid_returns_immediately() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(status_body("abc", "INVALID"));
        let status = handle(&transport)
            .wait_for_committed(Duration::from_secs(60), Duration::from_secs(1))
            .unwrap();
        assert_eq!(status, CommitStatus::Invalid);
        assert_eq!(transport.request_count(), 1);
    }
}
