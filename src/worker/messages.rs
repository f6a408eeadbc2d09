//! Worker message types for request execution off the coordinator.
//!
//! This module defines the request and response protocol between the coordinator
//! and the tasks that execute backend calls. Listing requests carry the
//! [`RequestFingerprint`] stamped at dispatch time and their responses echo it
//! back, so the coordinator can drop responses to superseded requests. Every
//! request also carries a [`TraceContext`] linking the task's spans to the span
//! that dispatched it.

use crate::api::{FavoriteState, MoviePage};
use crate::domain::{Credentials, RequestFingerprint, SearchCriteria};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` if the current span has no valid OpenTelemetry context,
    /// e.g. when tracing is not initialized.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds a remote OpenTelemetry context to use as a span parent.
    ///
    /// Returns `None` if either ID is not valid hex.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Generates constructors for `WorkerMessage` variants that attach the current
/// trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    search_movies(SearchMovies { criteria: SearchCriteria, fingerprint: RequestFingerprint }),
    fetch_favorites(FetchFavorites { page: u32, fingerprint: RequestFingerprint }),
    toggle_favorite(ToggleFavorite { movie_id: String, currently_favorite: bool }),
    google_login(GoogleLogin { google_token: String }),
}

/// Requests dispatched by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Run a catalog search.
    SearchMovies {
        criteria: SearchCriteria,
        fingerprint: RequestFingerprint,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch one page of the user's favourites.
    FetchFavorites {
        page: u32,
        fingerprint: RequestFingerprint,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Flip the favourite flag of one title.
    ToggleFavorite {
        movie_id: String,
        currently_favorite: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Exchange an OAuth provider token for a session.
    GoogleLogin {
        google_token: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::SearchMovies { trace_context, .. }
            | Self::FetchFavorites { trace_context, .. }
            | Self::ToggleFavorite { trace_context, .. }
            | Self::GoogleLogin { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short name used as a span field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SearchMovies { .. } => "search_movies",
            Self::FetchFavorites { .. } => "fetch_favorites",
            Self::ToggleFavorite { .. } => "toggle_favorite",
            Self::GoogleLogin { .. } => "google_login",
        }
    }
}

/// Completions delivered back to the coordinator.
///
/// Failures carry the underlying error text for logging; user-facing wording is
/// chosen by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    SearchCompleted {
        fingerprint: RequestFingerprint,
        page: MoviePage,
    },

    SearchFailed {
        fingerprint: RequestFingerprint,
        message: String,
    },

    FavoritesLoaded {
        fingerprint: RequestFingerprint,
        page: MoviePage,
    },

    FavoritesFailed {
        fingerprint: RequestFingerprint,
        message: String,
    },

    FavoriteToggled {
        state: FavoriteState,
    },

    ToggleFailed {
        movie_id: String,
        message: String,
    },

    LoggedIn {
        credentials: Credentials,
    },

    LoginFailed {
        message: String,
    },
}
