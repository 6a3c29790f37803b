//! Scripted in-memory transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use base64::Engine;
use omi_protocol::PayloadCodec;
use omi_types::OmiObject;
use serde_json::{json, Value};

use crate::error::ClientResult;
use crate::transport::{HttpResponse, LedgerTransport};

#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, status: u16, body: Value) -> &Self {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        });
        self
    }

    pub fn push_ok(&self, body: Value) -> &Self {
        self.push(200, body)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next(&self, request: RecordedRequest) -> ClientResult<HttpResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        let response = self.responses.lock().unwrap().pop_front();
        Ok(response.unwrap_or_else(|| panic!("unscripted request to {url}")))
    }
}

impl LedgerTransport for ScriptedTransport {
    fn get(&self, url: &str) -> ClientResult<HttpResponse> {
        self.next(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            content_type: None,
            body: Vec::new(),
        })
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> ClientResult<HttpResponse> {
        self.next(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            content_type: Some(content_type.to_string()),
            body,
        })
    }
}

pub(crate) fn b64<T: OmiObject>(object: &T) -> String {
    base64::engine::general_purpose::STANDARD.encode(PayloadCodec::encode_object(object))
}

/// A `GET /state?address=` page holding `objects`.
pub(crate) fn state_page<T: OmiObject>(objects: &[T], next: Option<&str>) -> Value {
    let data: Vec<Value> = objects
        .iter()
        .map(|o| json!({ "address": o.address().to_string(), "data": b64(o) }))
        .collect();
    let paging = match next {
        Some(url) => json!({ "next": url }),
        None => json!({}),
    };
    json!({ "data": data, "paging": paging })
}

pub(crate) fn status_body(batch_id: &str, status: &str) -> Value {
    json!({ "data": { batch_id: status }, "link": "http://ledger.test/batch_status" })
}
