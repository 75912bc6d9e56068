//! In-memory transport used by unit tests

use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::client::{Client, ClientConfig, Transport};
use crate::error::Result;
use crate::types::Envelope;

/// A recorded transport call
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub path: String,
    pub body: Value,
    pub file: Option<PathBuf>,
    pub file_existed: bool,
}

/// Replays queued responses in order and records every call
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<Envelope>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<Envelope>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn push_ok(&self, data: Value) -> &Self {
        self.push(Ok(envelope(0, "success", data)))
    }

    pub fn push_code(&self, code: i64, msg: &str, data: Value) -> &Self {
        self.push(Ok(envelope(code, msg, data)))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next(&self, call: Call) -> Result<Envelope> {
        let path = call.path.clone();
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected call to {}", path))
    }
}

impl Transport for ScriptedTransport {
    async fn post_json(&self, path: &str, body: Value) -> Result<Envelope> {
        self.next(Call {
            path: path.to_string(),
            body,
            file: None,
            file_existed: false,
        })
    }

    async fn post_file(
        &self,
        path: &str,
        fields: Vec<(&'static str, String)>,
        file: &Path,
    ) -> Result<Envelope> {
        let body: Map<String, Value> = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        self.next(Call {
            path: path.to_string(),
            body: Value::Object(body),
            file: Some(file.to_path_buf()),
            file_existed: file.is_file(),
        })
    }
}

pub(crate) fn envelope(code: i64, msg: &str, data: Value) -> Envelope {
    Envelope {
        code,
        msg: msg.to_string(),
        error_messages: None,
        data,
    }
}

pub(crate) fn scripted_client() -> (Client<ScriptedTransport>, ScriptedTransport) {
    scripted_client_with(ClientConfig::new("test-key"))
}

pub(crate) fn scripted_client_with(
    config: ClientConfig,
) -> (Client<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    (Client::with_transport(config, transport.clone()), transport)
}
