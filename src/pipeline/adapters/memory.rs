//! In-memory source transport for tests and deterministic flows.

use crate::pipeline::{
    domain::SourceRequest,
    ports::{SourceTransport, SourceTransportError, SourceTransportResult},
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Scripted reply for requests whose base URL matches a route.
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    result: SourceTransportResult<Value>,
    delay: Option<Duration>,
}

impl ScriptedReply {
    /// Replies with `body`.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            result: Ok(body),
            delay: None,
        }
    }

    /// Replies with `error`.
    #[must_use]
    pub fn err(error: SourceTransportError) -> Self {
        Self {
            result: Err(error),
            delay: None,
        }
    }

    /// Delays the reply by `delay`.
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Thread-safe in-memory source transport.
///
/// Requests are matched against routes by base-URL prefix, longest prefix
/// first; unmatched requests get the fallback reply, a `404` by default.
/// Every request is logged for later inspection.
#[derive(Debug, Clone)]
pub struct InMemorySourceTransport {
    state: Arc<RwLock<InMemoryTransportState>>,
}

#[derive(Debug)]
struct InMemoryTransportState {
    routes: Vec<(String, ScriptedReply)>,
    fallback: ScriptedReply,
    requests: Vec<SourceRequest>,
}

impl Default for InMemorySourceTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySourceTransport {
    /// Creates a transport with no routes and a `404` fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTransportState {
                routes: Vec::new(),
                fallback: ScriptedReply::err(SourceTransportError::Status(404)),
                requests: Vec::new(),
            })),
        }
    }

    /// Replaces the reply for unmatched requests.
    #[must_use]
    pub fn with_fallback(self, reply: ScriptedReply) -> Self {
        self.set_fallback(reply);
        self
    }

    /// Replaces the reply for unmatched requests in place.
    pub fn set_fallback(&self, reply: ScriptedReply) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fallback = reply;
    }

    /// Routes requests whose base URL starts with `prefix` to `reply`.
    ///
    /// An existing route for the same prefix is replaced.
    pub fn route(&self, prefix: impl Into<String>, reply: ScriptedReply) {
        let key = prefix.into();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.routes.retain(|(existing, _)| *existing != key);
        state.routes.push((key, reply));
        state
            .routes
            .sort_by_key(|(existing, _)| std::cmp::Reverse(existing.len()));
    }

    /// Returns every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<SourceRequest> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }

    /// Returns how many requests have been received.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .len()
    }

    fn reply_for(&self, request: &SourceRequest) -> ScriptedReply {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(request.clone());
        state
            .routes
            .iter()
            .find(|(prefix, _)| request.base_url().starts_with(prefix.as_str()))
            .map_or_else(|| state.fallback.clone(), |(_, reply)| reply.clone())
    }
}

#[async_trait]
impl SourceTransport for InMemorySourceTransport {
    async fn fetch(&self, request: &SourceRequest) -> SourceTransportResult<Value> {
        let reply = self.reply_for(request);
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.result
    }
}
