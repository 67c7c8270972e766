//! Scripted provider client shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{ApiError, RemoteClient};

/// One recorded `call` against the provider
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub session: Value,
    pub params: Map<String, Value>,
}

/// Replays queued responses in order and records what it was asked.
#[derive(Default)]
pub struct ScriptedClient {
    logins: Mutex<VecDeque<Result<Value, ApiError>>>,
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    login_calls: Mutex<usize>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(self, response: Result<Value, ApiError>) -> Self {
        self.logins.lock().unwrap().push_back(response);
        self
    }

    pub fn with_call(self, response: Result<Value, ApiError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn login_calls(&self) -> usize {
        *self.login_calls.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteClient for ScriptedClient {
    async fn login(&self, _account_id: &str, _secret: &str) -> Result<Value, ApiError> {
        *self.login_calls.lock().unwrap() += 1;
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected login call")
    }

    async fn call(
        &self,
        session: &Value,
        operation: &str,
        params: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: operation.to_string(),
            session: session.clone(),
            params,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected query call")
    }
}

/// Provider login response carrying `{"token": token}` as the session
pub fn login_ok(token: &str) -> Value {
    json!({
        "responseData": {
            "resultCode": "0000",
            "data": { "loginSuccessResult": { "token": token } }
        }
    })
}

pub fn success(marker: &str) -> Value {
    json!({ "responseData": { "data": { "marker": marker } } })
}

pub fn expired() -> Value {
    json!({ "headerInfos": { "code": "X201", "reason": "token expired" } })
}
