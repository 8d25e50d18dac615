//! Scripted in-memory transport for tests

use super::http::Transport;
use crate::error::FetchError;
use crate::resource::Endpoint;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

type Window = (String, u32, u64);

/// Answers requests from a fixed script and records every request made
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: HashMap<Window, Result<Value, FetchError>>,
    requests: Mutex<Vec<Window>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, endpoint: &str, limit: u32, offset: u64, body: Value) -> Self {
        self.responses
            .insert((endpoint.to_string(), limit, offset), Ok(body));
        self
    }

    pub fn fail(mut self, endpoint: &str, limit: u32, offset: u64, error: FetchError) -> Self {
        self.responses
            .insert((endpoint.to_string(), limit, offset), Err(error));
        self
    }

    /// Every `(endpoint, limit, offset)` requested so far, in order
    pub fn requests(&self) -> Vec<Window> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    async fn get_page(
        &self,
        endpoint: &Endpoint,
        limit: u32,
        offset: u64,
    ) -> Result<Value, FetchError> {
        let window = (endpoint.as_str().to_string(), limit, offset);
        self.requests.lock().unwrap().push(window.clone());
        self.responses
            .get(&window)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    status: 404,
                    body: format!("no scripted response for {:?}", window),
                })
            })
    }
}
