//! Coordinator state and the request-issuing primitives.
//!
//! [`AppState`] is the single source of truth for everything on screen: the
//! current listing, its paging, loading and error flags, the draft criteria in
//! the search controls, and the signed-in session. Only the event handler
//! mutates it.
//!
//! # Race guard
//!
//! Every listing request is stamped with a [`RequestFingerprint`] that is written
//! to [`AppState::latest_request`] *before* the request action is returned. A
//! completion is applied only if its fingerprint still equals `latest_request`;
//! anything else belongs to a superseded request and is dropped. Resetting to
//! idle also stamps a fingerprint, so requests issued before the reset can never
//! repopulate the cleared view.
//!
//! # Invariants
//!
//! - `active_mode == Idle` implies no movies, no pagination, and
//!   `has_searched == false`.
//! - `is_loading` is cleared by the completion of the latest request, success
//!   or failure.
//!
//! # Example
//!
//! ```rust
//! use movie_mania::app::{AppState, Phase};
//! use movie_mania::domain::SearchCriteria;
//!
//! let mut state = AppState::default();
//! let actions = state.issue_search(&SearchCriteria::new("alien"));
//! assert_eq!(actions.len(), 1);
//! assert_eq!(state.phase(), Phase::Searching);
//! assert_eq!(state.latest_request.as_ref().map(|f| f.as_str()), Some("alien|||1"));
//! ```

use super::modes::{ActiveMode, Phase};
use super::Action;
use crate::api::{FavoriteState, MoviePage};
use crate::domain::{AuthState, Movie, PaginationInfo, RequestFingerprint, SearchCriteria};
use crate::worker::WorkerMessage;

/// Shown when a search request fails.
pub const SEARCH_ERROR_MESSAGE: &str = "Unable to fetch movies right now.";

/// Shown when a favourites request fails.
pub const FAVORITES_ERROR_MESSAGE: &str = "Unable to fetch favourites right now.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Titles of the visible page, in server order.
    pub movies: Vec<Movie>,

    /// Paging of the visible listing; `None` while idle or after an error.
    pub pagination: Option<PaginationInfo>,

    pub is_loading: bool,

    /// `true` once any listing was requested since the last reset to idle.
    pub has_searched: bool,

    /// User-facing error of the last failed listing request.
    pub error: Option<String>,

    pub active_mode: ActiveMode,

    /// Criteria of the last issued search, without the page. Page changes in
    /// search mode replay these.
    pub last_criteria: Option<SearchCriteria>,

    /// Contents of the search controls, which may run ahead of `last_criteria`
    /// while a debounced search is pending.
    pub draft: SearchCriteria,

    /// Fingerprint of the most recently dispatched listing request.
    pub latest_request: Option<RequestFingerprint>,

    /// Stamp of the current debounce window. Bumped whenever a debounced
    /// search is scheduled or cancelled; a fire carrying an older stamp is
    /// dropped.
    pub search_generation: u64,

    pub auth: AuthState,
}

impl AppState {
    /// Creates an idle state with a rehydrated session.
    #[must_use]
    pub fn new(auth: AuthState) -> Self {
        Self {
            auth,
            ..Self::default()
        }
    }

    /// Derives the state-machine phase from the current flags.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.active_mode {
            ActiveMode::Idle => Phase::Idle,
            _ if self.is_loading => Phase::Searching,
            _ if self.error.is_some() => Phase::Errored,
            ActiveMode::Favorites => Phase::ViewingFavorites,
            ActiveMode::Search if self.movies.is_empty() => Phase::ResultsEmpty,
            ActiveMode::Search => Phase::ResultsReady,
        }
    }

    #[must_use]
    pub fn is_latest(&self, fingerprint: &RequestFingerprint) -> bool {
        self.latest_request.as_ref() == Some(fingerprint)
    }

    #[must_use]
    pub fn movie(&self, movie_id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == movie_id)
    }

    /// Opens a new debounce window for `criteria`, superseding any pending one.
    pub fn schedule_search(&mut self, criteria: SearchCriteria) -> Action {
        self.search_generation = self.search_generation.wrapping_add(1);
        Action::ScheduleSearch {
            criteria,
            generation: self.search_generation,
        }
    }

    /// Invalidates the pending debounced search, including a fire already queued.
    pub fn cancel_scheduled_search(&mut self) -> Action {
        self.search_generation = self.search_generation.wrapping_add(1);
        Action::CancelScheduledSearch
    }

    /// Issues a search for `criteria`; the primitive behind every search path.
    ///
    /// Stamps the request fingerprint first. A blank query resets to idle and
    /// returns no actions; otherwise enters the loading phase and returns the
    /// request to dispatch.
    pub fn issue_search(&mut self, criteria: &SearchCriteria) -> Vec<Action> {
        let criteria = criteria.normalized();
        let fingerprint = RequestFingerprint::for_search(&criteria);
        self.latest_request = Some(fingerprint.clone());

        if criteria.is_blank() {
            tracing::debug!("blank query, resetting to idle");
            self.reset_to_idle();
            return vec![];
        }

        tracing::debug!(%fingerprint, "issuing search");
        self.is_loading = true;
        self.has_searched = true;
        self.error = None;
        self.active_mode = ActiveMode::Search;
        self.last_criteria = Some(SearchCriteria {
            page: None,
            ..criteria.clone()
        });

        vec![Action::PostToWorker(WorkerMessage::search_movies(criteria, fingerprint))]
    }

    /// Issues a favourites listing request for `page`.
    pub fn issue_favorites(&mut self, page: u32) -> Vec<Action> {
        let page = page.max(1);
        let fingerprint = RequestFingerprint::for_favorites(page);
        self.latest_request = Some(fingerprint.clone());

        tracing::debug!(%fingerprint, "issuing favorites fetch");
        self.is_loading = true;
        self.has_searched = true;
        self.error = None;
        self.active_mode = ActiveMode::Favorites;

        vec![Action::PostToWorker(WorkerMessage::fetch_favorites(page, fingerprint))]
    }

    /// Clears the listing and returns to the idle view.
    pub fn reset_to_idle(&mut self) {
        self.movies.clear();
        self.pagination = None;
        self.is_loading = false;
        self.has_searched = false;
        self.error = None;
        self.active_mode = ActiveMode::Idle;
        self.last_criteria = None;
    }

    /// Applies a successful listing if it answers the latest request.
    ///
    /// Favourites listings have every flag forced to `true`. Returns `false` for
    /// stale completions, which leave the state untouched.
    pub fn apply_listing(&mut self, fingerprint: &RequestFingerprint, page: &MoviePage, favorites: bool) -> bool {
        if !self.is_latest(fingerprint) {
            tracing::debug!(%fingerprint, latest = ?self.latest_request, "dropping stale listing");
            return false;
        }

        self.movies.clone_from(&page.movies);
        if favorites {
            for movie in &mut self.movies {
                movie.is_favorite = true;
            }
        }
        self.pagination = Some(page.pagination);
        self.is_loading = false;
        self.error = None;

        tracing::debug!(%fingerprint, movie_count = self.movies.len(), "listing applied");
        true
    }

    /// Applies a failed listing if it answers the latest request.
    pub fn apply_listing_failure(&mut self, fingerprint: &RequestFingerprint, user_message: &str) -> bool {
        if !self.is_latest(fingerprint) {
            tracing::debug!(%fingerprint, "dropping stale failure");
            return false;
        }

        self.movies.clear();
        self.pagination = None;
        self.is_loading = false;
        self.error = Some(user_message.to_string());
        true
    }

    /// Updates the favourite flag of the matching movie only.
    ///
    /// Returns `true` if a visible movie changed.
    pub fn apply_favorite_state(&mut self, state: &FavoriteState) -> bool {
        let Some(movie) = self.movies.iter_mut().find(|m| m.id == state.movie_id) else {
            tracing::debug!(movie_id = %state.movie_id, "toggled movie no longer visible");
            return false;
        };

        let changed = movie.is_favorite != state.is_favorite;
        movie.is_favorite = state.is_favorite;
        changed
    }
}
