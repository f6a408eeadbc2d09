//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler never performs I/O. It returns a `Vec<Action>` after
//! processing each event, and the runtime executes them in order: spawning
//! backend requests, driving the debouncer, updating the HTTP client's bearer
//! token, and persisting the session.
//!
//! # Example
//!
//! ```rust
//! use movie_mania::app::Action;
//! use movie_mania::domain::{RequestFingerprint, SearchCriteria};
//! use movie_mania::worker::WorkerMessage;
//!
//! let criteria = SearchCriteria::new("dune");
//! let fingerprint = RequestFingerprint::for_search(&criteria);
//! let actions = vec![
//!     Action::CancelScheduledSearch,
//!     Action::PostToWorker(WorkerMessage::search_movies(criteria, fingerprint)),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::{AuthState, SearchCriteria};
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Spawns a task executing the message against the backend.
    ///
    /// The task's response comes back as [`Event::WorkerResponse`](super::Event::WorkerResponse).
    PostToWorker(WorkerMessage),

    /// Restarts the debounce window with these criteria.
    ///
    /// When the window elapses the runtime receives
    /// [`Event::DebouncedSearch`](super::Event::DebouncedSearch) carrying the
    /// same criteria and generation.
    ScheduleSearch { criteria: SearchCriteria, generation: u64 },

    /// Drops any pending debounced search.
    CancelScheduledSearch,

    /// Sets (or clears) the bearer token attached to backend requests.
    SetAuthToken(Option<String>),

    /// Writes the session to local storage.
    PersistSession(AuthState),

    /// Removes the session from local storage.
    ClearPersistedSession,
}
