//! In-memory transport for unit tests

use super::{ResolvedRequest, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Response produced for one request
pub(crate) type Responder = Box<dyn Fn(&ResolvedRequest) -> Result<Value> + Send + Sync>;

/// Transport that records every request and replies from a script
///
/// Queued responses are consumed first; once empty, the fallback responder
/// (if any) answers, otherwise an empty `data` envelope is returned.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<ResolvedRequest>>,
    queue: Mutex<VecDeque<Result<Value>>>,
    fallback: Option<Responder>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reply to every request with `f`
    pub(crate) fn with_responder(
        f: impl Fn(&ResolvedRequest) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            fallback: Some(Box::new(f)),
            ..Default::default()
        }
    }

    /// Queue a successful response
    pub(crate) fn push(&self, value: Value) -> &Self {
        self.queue.lock().unwrap().push_back(Ok(value));
        self
    }

    /// Queue a failure
    pub(crate) fn push_err(&self, error: Error) -> &Self {
        self.queue.lock().unwrap().push_back(Err(error));
        self
    }

    /// Requests received so far
    pub(crate) fn requests(&self) -> Vec<ResolvedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ResolvedRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(f) => f(request),
            None => Ok(json!({"result": "success", "data": []})),
        }
    }
}

/// Serve `total` numbered records in pages driven by `skip`/`limit`
pub(crate) fn offset_responder(total: u64) -> impl Fn(&ResolvedRequest) -> Result<Value> {
    move |req| {
        let skip = req.query.get("skip").and_then(Value::as_u64).unwrap_or(0);
        let limit = req.query.get("limit").and_then(Value::as_u64).unwrap_or(total);
        let end = (skip + limit).min(total);
        let data: Vec<Value> = (skip.min(total)..end).map(|i| json!({"id": i})).collect();
        Ok(json!({"result": "success", "data": data}))
    }
}

/// Serve `total` numbered records in pages driven by `page`/`per_page`
pub(crate) fn page_responder(total: u64) -> impl Fn(&ResolvedRequest) -> Result<Value> {
    move |req| {
        let page = req.query.get("page").and_then(Value::as_u64).unwrap_or(1).max(1);
        let per_page = req
            .query
            .get("per_page")
            .and_then(Value::as_u64)
            .unwrap_or(total);
        let start = ((page - 1) * per_page).min(total);
        let end = (start + per_page).min(total);
        let data: Vec<Value> = (start..end).map(|i| json!({"id": i})).collect();
        Ok(json!({"result": "success", "data": data}))
    }
}
