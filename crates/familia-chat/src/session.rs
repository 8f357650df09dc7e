//! Conversation state around a chat backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use familia_core::chat::{ChatBackend, ChatMessage, ChatRequest};
use familia_core::settings::ChatSettings;

/// A transcript plus a one-request-at-a-time gate.
///
/// A send while another is in flight is dropped, not queued. A failed send
/// keeps the user's message, adds no reply and records the error.
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    model: Mutex<String>,
    in_flight: AtomicBool,
    messages: Mutex<Vec<ChatMessage>>,
    last_error: Mutex<Option<String>>,
}

/// Clears the in-flight flag when the send finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: Mutex::new(model.into()),
            in_flight: AtomicBool::new(false),
            messages: Mutex::new(Vec::new()),
            last_error: Mutex::new(None),
        }
    }

    pub fn from_settings(backend: Arc<dyn ChatBackend>, settings: &ChatSettings) -> Self {
        Self::new(backend, settings.model.clone())
    }

    pub fn model(&self) -> String {
        self.model
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_model(&self, model: impl Into<String>) {
        *self.model.lock().unwrap_or_else(PoisonError::into_inner) = model.into();
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Empty the transcript and forget the last error.
    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Send `text` and wait for the reply.
    ///
    /// Returns `Ok(None)` without contacting the backend when `text` is blank
    /// or another send is still in flight.
    pub async fn send(&self, text: &str) -> anyhow::Result<Option<ChatMessage>> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("chat request already in flight, ignoring send");
            return Ok(None);
        }
        let _guard = InFlight(&self.in_flight);

        self.push(ChatMessage::user(prompt));
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = None;

        let request = ChatRequest {
            model: self.model(),
            prompt: prompt.to_string(),
        };

        match self.backend.generate(&request).await {
            Ok(reply) => {
                let message = ChatMessage::assistant(reply);
                self.push(message.clone());
                Ok(Some(message))
            }
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "chat request failed");
                *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(e.to_string());
                Err(e)
            }
        }
    }

    fn push(&self, message: ChatMessage) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}
