//! familia-core: daily stats, content and quiz logic for the family Spanish
//! vocabulary app.
//!
//! Everything persistent goes through a [`store::Store`], a JSON adapter over
//! a pluggable key-value backend. The daily stats tracker, content library
//! and settings are thin layers over it.

pub mod chat;
pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod keys;
pub mod quiz;
pub mod seed;
pub mod settings;
pub mod stats;
pub mod store;
pub mod transcoder;
