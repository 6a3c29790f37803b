use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Raw response from the ledger REST API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success status into [`ClientError::Transport`].
    pub fn error_for_status(self, url: &str) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            warn!(status = self.status, url, "ledger request failed");
            Err(ClientError::Transport {
                status: self.status,
                url: url.to_string(),
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Json {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Blocking request interface to the ledger REST API.
///
/// Implementations return every HTTP response, success or not; mapping
/// status codes to errors is the caller's job. Only connection-level
/// failures surface as `Err`. One attempt per call, no retries.
pub trait LedgerTransport: Send + Sync {
    fn get(&self, url: &str) -> ClientResult<HttpResponse>;

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> ClientResult<HttpResponse>;
}

/// [`LedgerTransport`] over HTTP.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn finish(response: reqwest::blocking::Response) -> ClientResult<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl LedgerTransport for HttpTransport {
    fn get(&self, url: &str) -> ClientResult<HttpResponse> {
        debug!(url, "GET");
        Self::finish(self.client.get(url).send()?)
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> ClientResult<HttpResponse> {
        debug!(url, bytes = body.len(), "POST");
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()?;
        Self::finish(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        for status in [200, 201, 202, 204] {
            assert!(HttpResponse { status, body: vec![] }.is_success());
        }
        for status in [199, 301, 404, 500] {
            assert!(!HttpResponse { status, body: vec![] }.is_success());
        }
    }

    #[test]
    fn error_for_status_carries_code_and_url() {
        let err = HttpResponse { status: 429, body: vec![] }
            .error_for_status("http://ledger/batches")
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport { status: 429, ref url } if url == "http://ledger/batches"
        ));
    }

    #[test]
    fn json_errors_name_the_url() {
        let resp = HttpResponse { status: 200, body: b"<html>".to_vec() };
        let err = resp.json::<serde_json::Value>("http://ledger/state").unwrap_err();
        assert!(matches!(err, ClientError::Json { ref url, .. } if url == "http://ledger/state"));
    }

    #[test]
    fn http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(1)).is_ok());
    }
}
