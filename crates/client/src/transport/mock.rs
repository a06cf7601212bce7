//! Mock implementation for unit testing.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Transport, TransportError};

struct Stub {
    endpoint: String,
    required: Vec<(String, String)>,
    response: Result<Value, TransportError>,
}

/// Canned-response [`Transport`] for unit tests.
///
/// Register responses by endpoint with the `with_*` builders. An endpoint key
/// may carry a query (`/member?offset=250`); such a stub only matches calls
/// whose params include every listed pair, and the most specific match wins.
/// Unregistered endpoints answer `NotFound`.
#[derive(Default)]
pub struct MockTransport {
    stubs: Mutex<Vec<Stub>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

fn split_key(key: &str) -> (String, Vec<(String, String)>) {
    match key.split_once('?') {
        Some((endpoint, query)) => {
            let required = query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (endpoint.to_string(), required)
        }
        None => (key.to_string(), Vec::new()),
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `key` with a JSON payload.
    pub fn with_json(self, key: &str, value: Value) -> Self {
        self.set(key, Ok(value));
        self
    }

    /// Answer `key` with an error.
    pub fn with_error(self, key: &str, error: TransportError) -> Self {
        self.set(key, Err(error));
        self
    }

    /// Delay every response for `endpoint`.
    pub fn with_delay(self, endpoint: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(endpoint.to_string(), delay);
        self
    }

    /// Register or replace a response after construction.
    pub fn set(&self, key: &str, response: Result<Value, TransportError>) {
        let (endpoint, required) = split_key(key);
        self.stubs.lock().unwrap().push(Stub { endpoint, required, response });
    }

    /// Every endpoint requested, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
    }

    /// Number of requests made to `endpoint`.
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(e, _)| e == endpoint).count()
    }

    /// Number of requests made to any endpoint.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Params of the most recent request to `endpoint`.
    pub fn last_params(&self, endpoint: &str) -> Option<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == endpoint)
            .map(|(_, p)| p.clone())
    }

    fn lookup(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, TransportError> {
        let stubs = self.stubs.lock().unwrap();
        stubs
            .iter()
            .filter(|stub| stub.endpoint == endpoint && stub.required.iter().all(|pair| params.contains(pair)))
            .max_by_key(|stub| stub.required.len())
            .map(|stub| stub.response.clone())
            .unwrap_or_else(|| Err(TransportError::not_found(endpoint)))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, TransportError> {
        let params: Vec<(String, String)> = params.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect();
        self.calls.lock().unwrap().push((endpoint.to_string(), params.clone()));

        let delay = self.delays.lock().unwrap().get(endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.lookup(endpoint, &params)
    }
}
