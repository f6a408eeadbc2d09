//! Application layer: the search and favourites coordinator.
//!
//! This module holds the pure part of the client. It owns no sockets, timers,
//! or files; it only turns events into state changes and side-effect actions,
//! which makes every transition testable without a runtime.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Active listing mode and derived state-machine phase
//! - [`state`]: Central state container and the request-issuing primitives

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{ActiveMode, Phase};
pub use state::{AppState, FAVORITES_ERROR_MESSAGE, SEARCH_ERROR_MESSAGE};
