//! Local client storage.
//!
//! A small persistent key/value store, the equivalent of a browser's local
//! storage, used to keep the signed-in session across restarts.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `models`: Persisted record types and session load/save helpers

pub mod backend;
pub mod json;
pub mod models;

pub use backend::Storage;
pub use json::JsonStorage;
pub use models::{load_session, save_session, SessionRecord};
