//! Mock backend for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use familia_core::chat::{ChatBackend, ChatRequest};

use crate::error::ChatError;

/// A scripted chat backend.
///
/// Replies are chosen by prompt substring; an optional delay keeps a request
/// in flight long enough to exercise the session gate.
pub struct MockChat {
    /// Map of prompt substring → reply.
    responses: HashMap<String, String>,
    default_response: String,
    fail_with: Option<u16>,
    delay: Option<Duration>,
    call_count: AtomicU32,
    last_request: Mutex<Option<ChatRequest>>,
}

impl MockChat {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: "¡Hola!".to_string(),
            fail_with: None,
            delay: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock that always returns the same reply.
    pub fn with_fixed_response(response: &str) -> Self {
        let mut mock = Self::new(HashMap::new());
        mock.default_response = response.to_string();
        mock
    }

    /// A mock whose every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        let mut mock = Self::new(HashMap::new());
        mock.fail_with = Some(status);
        mock
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatBackend for MockChat {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &ChatRequest) -> anyhow::Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(status) = self.fail_with {
            return Err(ChatError::ApiError {
                status,
                message: String::new(),
            }
            .into());
        }

        Ok(self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone()))
    }
}
