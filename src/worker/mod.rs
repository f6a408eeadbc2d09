//! Asynchronous execution of backend requests.
//!
//! The coordinator never awaits: it emits [`WorkerMessage`]s, the runtime spawns
//! one task per message running [`MovieWorker::handle_message`], and each task's
//! [`WorkerResponse`] is fed back to the coordinator as an event. In-flight
//! requests therefore overlap and may complete in any order.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::MovieWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
