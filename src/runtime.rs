//! Effect executor around the pure coordinator.
//!
//! The [`Runtime`] owns the [`AppState`] and is its only writer. Events arrive on
//! an unbounded channel (user input through a [`RuntimeHandle`], debouncer fires,
//! and worker completions), are fed to [`handle_event`], and the returned
//! actions are executed here:
//!
//! | Action                  | Effect                                                  |
//! |-------------------------|---------------------------------------------------------|
//! | `PostToWorker`          | spawns a task running [`MovieWorker::handle_message`]   |
//! | `ScheduleSearch`        | restarts the debouncer                                  |
//! | `CancelScheduledSearch` | aborts the pending debounced search                     |
//! | `SetAuthToken`          | updates the bearer token of the API client              |
//! | `PersistSession`        | writes the session record to local storage             |
//! | `ClearPersistedSession` | removes the session record                              |
//!
//! Worker tasks run concurrently and report back through the same channel, so
//! completions may arrive in any order; the coordinator discards stale ones.
//! Debouncer fires share that channel too: a fire queued just before a cancel
//! reaches the coordinator with an outdated generation and is dropped there.

use crate::api::MovieApi;
use crate::app::{handle_event, Action, AppState, Event};
use crate::domain::{MovieManiaError, Result};
use crate::infrastructure::Debouncer;
use crate::storage::{load_session, save_session, Storage};
use crate::worker::{MovieWorker, WorkerMessage};
use crate::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub struct Runtime {
    state: AppState,
    auth_storage_key: String,
    worker: MovieWorker,
    storage: Box<dyn Storage>,
    debouncer: Debouncer<Event>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    snapshots: watch::Sender<AppState>,
    stopped: bool,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("state", &self.state)
            .field("debouncer", &self.debouncer)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

/// Cloneable front door to a running [`Runtime`].
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Receiver<AppState>,
}

impl RuntimeHandle {
    /// Queues an event for the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`MovieManiaError::Worker`] if the runtime has been dropped.
    pub fn send(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| MovieManiaError::Worker("runtime is no longer running".to_string()))
    }

    /// Returns a receiver of state snapshots, published after every visible change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.snapshots.clone()
    }

    /// Asks the runtime to stop after the events already queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime has already been dropped.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Event::Shutdown)
    }
}

impl Runtime {
    /// Builds a runtime, rehydrating the persisted session from `storage`.
    ///
    /// A restored session's access token is handed to `api` before any request
    /// can be issued.
    pub fn new(config: &Config, api: Arc<dyn MovieApi>, storage: Box<dyn Storage>) -> Self {
        let auth = load_session(storage.as_ref(), &config.auth_storage_key);
        if auth.is_authenticated() {
            tracing::debug!("restored persisted session");
            api.set_access_token(auth.access_token.clone());
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let debounce_tx = events_tx.clone();
        let debouncer = Debouncer::new(Duration::from_millis(config.debounce_ms), move |event| {
            if debounce_tx.send(event).is_err() {
                tracing::debug!("runtime dropped before debounced search fired");
            }
        });

        let state = AppState::new(auth);
        let (snapshots, _) = watch::channel(state.clone());

        Self {
            state,
            auth_storage_key: config.auth_storage_key.clone(),
            worker: MovieWorker::new(api),
            storage,
            debouncer,
            events_tx,
            events_rx,
            snapshots,
            stopped: false,
        }
    }

    #[must_use]
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            events: self.events_tx.clone(),
            snapshots: self.snapshots.subscribe(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Returns `true` while a debounced search is waiting to fire.
    #[must_use]
    pub fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Processes one event and executes the resulting actions.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event handler.
    pub fn dispatch(&mut self, event: &Event) -> Result<()> {
        let (render, actions) = handle_event(&mut self.state, event)?;

        for action in actions {
            self.execute_action(action);
        }

        if matches!(event, Event::Shutdown) {
            self.stopped = true;
        }

        if render {
            self.snapshots.send_replace(self.state.clone());
        }
        Ok(())
    }

    /// Waits for the next queued event and dispatches it.
    ///
    /// Returns `Ok(false)` once the runtime has stopped.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Runtime::dispatch`].
    pub async fn pump(&mut self) -> Result<bool> {
        if self.stopped {
            return Ok(false);
        }
        let Some(event) = self.events_rx.recv().await else {
            return Ok(false);
        };
        self.dispatch(&event)?;
        Ok(!self.stopped)
    }

    /// Processes events until [`Event::Shutdown`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Runtime::dispatch`].
    pub async fn run(mut self) -> Result<()> {
        tracing::debug!("runtime started");
        while self.pump().await? {}
        tracing::debug!("runtime stopped");
        Ok(())
    }

    fn execute_action(&mut self, action: Action) {
        match action {
            Action::PostToWorker(message) => self.post_to_worker(message),
            Action::ScheduleSearch { criteria, generation } => {
                self.debouncer.schedule(Event::DebouncedSearch { criteria, generation });
            }
            Action::CancelScheduledSearch => self.debouncer.cancel(),
            Action::SetAuthToken(token) => self.worker.api().set_access_token(token),
            Action::PersistSession(auth) => {
                if let Err(e) = save_session(self.storage.as_mut(), &self.auth_storage_key, &auth) {
                    tracing::warn!(error = %e, "failed to persist session");
                }
            }
            Action::ClearPersistedSession => {
                if let Err(e) = self.storage.remove_item(&self.auth_storage_key) {
                    tracing::warn!(error = %e, "failed to clear persisted session");
                }
            }
        }
    }

    fn post_to_worker(&self, message: WorkerMessage) {
        tracing::debug!(kind = message.kind(), "posting message to worker");
        let worker = self.worker.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let response = worker.handle_message(message).await;
            if events.send(Event::WorkerResponse(response)).is_err() {
                tracing::debug!("runtime dropped before worker response arrived");
            }
        });
    }
}
