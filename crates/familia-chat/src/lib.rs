//! familia-chat: chat with a local LLM.
//!
//! Implements the `ChatBackend` trait for an Ollama-style `/api/generate`
//! endpoint, plus a mock for tests and a [`ChatSession`] that keeps the
//! transcript and allows one request in flight at a time.

pub mod error;
pub mod mock;
pub mod ollama;
pub mod session;

pub use error::ChatError;
pub use mock::MockChat;
pub use ollama::OllamaChat;
pub use session::ChatSession;
