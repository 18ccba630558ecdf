//! In-memory [`TestRailApi`] for pipeline tests.

use rail_client::{ApiError, TestRailApi};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Post(String, Value),
}

#[derive(Debug, Clone)]
enum Reply {
    Ok(Value),
    Status(u16, String),
}

/// Routes GETs by exact action; unrouted GETs answer 404. POSTs answer with
/// the body plus a fresh `id` unless a failure was registered for the action.
#[derive(Default)]
pub struct FakeApi {
    gets: Mutex<HashMap<String, Reply>>,
    post_failures: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, action: &str, body: Value) -> Self {
        self.gets
            .lock()
            .unwrap()
            .insert(action.to_string(), Reply::Ok(body));
        self
    }

    pub fn fail_get(self, action: &str, status: u16) -> Self {
        self.gets
            .lock()
            .unwrap()
            .insert(action.to_string(), Reply::Status(status, String::new()));
        self
    }

    pub fn fail_post(self, action: &str, status: u16, body: &str) -> Self {
        self.post_failures
            .lock()
            .unwrap()
            .insert(action.to_string(), Reply::Status(status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Get(action) => Some(action),
                Call::Post(..) => None,
            })
            .collect()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Post(action, body) => Some((action, body)),
                Call::Get(_) => None,
            })
            .collect()
    }
}

fn reply(reply: Reply) -> Result<Value, ApiError> {
    match reply {
        Reply::Ok(value) => Ok(value),
        Reply::Status(status, message) => Err(ApiError::Api { status, message }),
    }
}

impl TestRailApi for FakeApi {
    async fn get(&self, action: &str) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call::Get(action.to_string()));
        let routed = self.gets.lock().unwrap().get(action).cloned();
        reply(routed.unwrap_or_else(|| Reply::Status(404, String::new())))
    }

    async fn post(&self, action: &str, body: &Value) -> Result<Value, ApiError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(Call::Post(action.to_string(), body.clone()));
        let created_id = calls.len();
        drop(calls);

        if let Some(failure) = self.post_failures.lock().unwrap().get(action).cloned() {
            return reply(failure);
        }
        let mut created = body.clone();
        if let Some(map) = created.as_object_mut() {
            map.insert("id".into(), json!(created_id));
        }
        Ok(created)
    }
}
