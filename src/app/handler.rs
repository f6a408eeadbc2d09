//! Event handling and state transition logic.
//!
//! This module implements the coordinator: the single function that turns user
//! intents and request completions into state changes and side effects.
//!
//! # Architecture
//!
//! 1. Events arrive from the runtime (user input, debouncer fires, worker responses)
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Dispatch policies
//!
//! Free-text typing and discrete actions reach the backend through two entry
//! points that share [`AppState::issue_search`]:
//!
//! - **Debounced**: `QueryChanged` only schedules; the debouncer later feeds
//!   `DebouncedSearch` back in. A fire whose generation no longer matches
//!   [`AppState::search_generation`] was cancelled after its timer elapsed
//!   and is dropped.
//! - **Immediate**: `Submit`, filter changes, `Search`, page changes, and the
//!   favourites view issue at once and cancel any pending debounced search.
//!
//! # Example
//!
//! ```rust
//! use movie_mania::app::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (render, actions) = handle_event(&mut state, &Event::QueryChanged("batman".into()))?;
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::ScheduleSearch { .. }]));
//! # Ok::<(), movie_mania::MovieManiaError>(())
//! ```

use super::modes::ActiveMode;
use super::state::{FAVORITES_ERROR_MESSAGE, SEARCH_ERROR_MESSAGE};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{AuthState, MovieType, SearchCriteria};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, timers, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Free-text query edited. Debounced.
    QueryChanged(String),

    /// Year filter changed (`None` clears it). Immediate, resets to page 1.
    YearChanged(Option<String>),

    /// Type filter changed (`None` clears it). Immediate, resets to page 1.
    TypeChanged(Option<MovieType>),

    /// Explicit submit of the current search controls.
    Submit,

    /// Run a search for exactly these criteria. Immediate.
    Search(SearchCriteria),

    /// A debounce window elapsed. Ignored unless `generation` is still current.
    DebouncedSearch { criteria: SearchCriteria, generation: u64 },

    /// Show the user's favourites.
    ShowFavorites { page: u32 },

    /// Go to another page of the current listing.
    ChangePage(u32),

    /// Flip the favourite flag of a visible movie.
    ToggleFavorite { movie_id: String },

    /// Sign in with an ID token from the OAuth provider.
    Login { google_token: String },

    Logout,

    /// The backend rotated the session's token pair.
    TokensRefreshed { access_token: String, refresh_token: String },

    /// Completion of a request spawned by [`Action::PostToWorker`].
    WorkerResponse(WorkerResponse),

    /// Stop the runtime. Pending debounced searches are dropped.
    Shutdown,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean is `true` when visible state changed and should be re-published.
///
/// # Errors
///
/// Currently infallible; the `Result` is kept so the runtime can treat handler
/// failures uniformly.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::QueryChanged(query) => {
            state.draft.query.clone_from(query);

            let criteria = state.draft.clone().with_page(1);
            if criteria.is_blank() {
                return Ok((true, issue_immediate(state, &criteria)));
            }

            tracing::trace!(query = %query, "scheduling debounced search");
            Ok((true, vec![state.schedule_search(criteria)]))
        }
        Event::YearChanged(year) => {
            state.draft.year.clone_from(year);
            let criteria = state.draft.clone().with_page(1);
            Ok((true, issue_immediate(state, &criteria)))
        }
        Event::TypeChanged(kind) => {
            state.draft.kind = *kind;
            let criteria = state.draft.clone().with_page(1);
            Ok((true, issue_immediate(state, &criteria)))
        }
        Event::Submit => {
            let criteria = state.draft.clone().with_page(1);
            Ok((true, issue_immediate(state, &criteria)))
        }
        Event::Search(criteria) => Ok((true, issue_immediate(state, criteria))),
        Event::DebouncedSearch { criteria, generation } => {
            if *generation != state.search_generation {
                tracing::debug!(
                    generation,
                    current = state.search_generation,
                    "dropping superseded debounced search"
                );
                return Ok((false, vec![]));
            }
            Ok((true, state.issue_search(criteria)))
        }
        Event::ShowFavorites { page } => {
            let mut actions = vec![state.cancel_scheduled_search()];
            actions.extend(state.issue_favorites(*page));
            Ok((true, actions))
        }
        Event::ChangePage(page) => {
            let page = *page;
            if page < 1 || state.pagination.is_some_and(|p| !p.contains(page)) {
                tracing::debug!(page, "page out of range, ignoring");
                return Ok((false, vec![]));
            }

            let actions = match (state.active_mode, state.last_criteria.clone()) {
                (ActiveMode::Favorites, _) => state.issue_favorites(page),
                (ActiveMode::Search, Some(criteria)) => state.issue_search(&criteria.with_page(page)),
                _ => {
                    tracing::debug!(page, "no active listing, ignoring page change");
                    return Ok((false, vec![]));
                }
            };
            Ok((true, actions))
        }
        Event::ToggleFavorite { movie_id } => {
            let Some(movie) = state.movie(movie_id) else {
                tracing::debug!(movie_id = %movie_id, "toggle for unknown movie, ignoring");
                return Ok((false, vec![]));
            };

            tracing::debug!(movie_id = %movie_id, currently_favorite = movie.is_favorite, "toggling favorite");
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::toggle_favorite(
                    movie.id.clone(),
                    movie.is_favorite,
                ))],
            ))
        }
        Event::Login { google_token } => Ok((
            false,
            vec![Action::PostToWorker(WorkerMessage::google_login(google_token.clone()))],
        )),
        Event::Logout => {
            if state.auth == AuthState::default() {
                return Ok((false, vec![]));
            }
            tracing::debug!("signing out");
            state.auth.clear();
            Ok((true, vec![Action::SetAuthToken(None), Action::ClearPersistedSession]))
        }
        Event::TokensRefreshed {
            access_token,
            refresh_token,
        } => {
            if state.auth.user.is_none() {
                tracing::debug!("token refresh without a signed-in user, ignoring");
                return Ok((false, vec![]));
            }
            state.auth.update_tokens(access_token.clone(), refresh_token.clone());
            Ok((
                false,
                vec![
                    Action::SetAuthToken(Some(access_token.clone())),
                    Action::PersistSession(state.auth.clone()),
                ],
            ))
        }
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
        Event::Shutdown => Ok((false, vec![state.cancel_scheduled_search()])),
    }
}

/// The non-debounced entry point: cancels any pending debounced search, then issues.
fn issue_immediate(state: &mut AppState, criteria: &SearchCriteria) -> Vec<Action> {
    let mut actions = vec![state.cancel_scheduled_search()];
    actions.extend(state.issue_search(criteria));
    actions
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::SearchCompleted { fingerprint, page } => (state.apply_listing(fingerprint, page, false), vec![]),
        WorkerResponse::FavoritesLoaded { fingerprint, page } => (state.apply_listing(fingerprint, page, true), vec![]),
        WorkerResponse::SearchFailed { fingerprint, message } => {
            tracing::warn!(%fingerprint, error = %message, "search failed");
            (state.apply_listing_failure(fingerprint, SEARCH_ERROR_MESSAGE), vec![])
        }
        WorkerResponse::FavoritesFailed { fingerprint, message } => {
            tracing::warn!(%fingerprint, error = %message, "favorites fetch failed");
            (state.apply_listing_failure(fingerprint, FAVORITES_ERROR_MESSAGE), vec![])
        }
        WorkerResponse::FavoriteToggled { state: favorite } => (state.apply_favorite_state(favorite), vec![]),
        WorkerResponse::ToggleFailed { movie_id, message } => {
            tracing::warn!(movie_id = %movie_id, error = %message, "unable to update favourite");
            (false, vec![])
        }
        WorkerResponse::LoggedIn { credentials } => {
            tracing::debug!(user_id = %credentials.user.id, "signed in");
            state.auth.apply(credentials.clone());
            (
                true,
                vec![
                    Action::SetAuthToken(Some(credentials.access_token.clone())),
                    Action::PersistSession(state.auth.clone()),
                ],
            )
        }
        WorkerResponse::LoginFailed { message } => {
            tracing::warn!(error = %message, "google login failed");
            (false, vec![])
        }
    }
}
