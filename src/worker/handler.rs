//! Execution of worker messages against the backend.
//!
//! [`MovieWorker`] turns one [`WorkerMessage`] into one [`WorkerResponse`]. It
//! never fails: every API error is folded into the matching failure variant so
//! the coordinator always receives a completion and can clear its loading flag.

use crate::api::MovieApi;
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;
use tracing::Instrument;

#[derive(Clone)]
pub struct MovieWorker {
    api: Arc<dyn MovieApi>,
}

impl std::fmt::Debug for MovieWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieWorker").finish_non_exhaustive()
    }
}

impl MovieWorker {
    #[must_use]
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn MovieApi> {
        &self.api
    }

    /// Folds an API result into a response, logging failures at debug level.
    fn handle_api_result<T, F, E>(operation: &str, result: Result<T>, on_success: F, on_error: E) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
        E: FnOnce(String) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "api call successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "api call failed");
                on_error(e.to_string())
            }
        }
    }

    /// Processes a worker message and returns its completion.
    ///
    /// The span of the call is parented to the dispatching span when the message
    /// carries a trace context.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        if let Some(parent) = message.trace_context().and_then(|ctx| ctx.to_otel_context()) {
            use tracing_opentelemetry::OpenTelemetrySpanExt;
            span.set_parent(parent);
        }

        self.dispatch(message).instrument(span).await
    }

    async fn dispatch(&self, message: WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::SearchMovies { criteria, fingerprint, .. } => {
                let failed = fingerprint.clone();
                Self::handle_api_result(
                    "search movies",
                    self.api.search(&criteria).await,
                    |page| {
                        tracing::debug!(%fingerprint, movie_count = page.movies.len(), "search completed");
                        WorkerResponse::SearchCompleted { fingerprint, page }
                    },
                    |message| WorkerResponse::SearchFailed {
                        fingerprint: failed,
                        message,
                    },
                )
            }

            WorkerMessage::FetchFavorites { page, fingerprint, .. } => {
                let failed = fingerprint.clone();
                Self::handle_api_result(
                    "fetch favorites",
                    self.api.favorites(page).await,
                    |page| WorkerResponse::FavoritesLoaded { fingerprint, page },
                    |message| WorkerResponse::FavoritesFailed {
                        fingerprint: failed,
                        message,
                    },
                )
            }

            WorkerMessage::ToggleFavorite {
                movie_id,
                currently_favorite,
                ..
            } => Self::handle_api_result(
                "toggle favorite",
                self.api.toggle_favorite(&movie_id, currently_favorite).await,
                |state| WorkerResponse::FavoriteToggled { state },
                |message| WorkerResponse::ToggleFailed { movie_id, message },
            ),

            WorkerMessage::GoogleLogin { google_token, .. } => Self::handle_api_result(
                "google login",
                self.api.google_login(&google_token).await,
                |credentials| WorkerResponse::LoggedIn { credentials },
                |message| WorkerResponse::LoginFailed { message },
            ),
        }
    }
}
