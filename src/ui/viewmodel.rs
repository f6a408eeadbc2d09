//! Display-ready view of [`AppState`].
//!
//! View models are computed via [`AppState::compute_viewmodel`] and consumed by
//! the renderer. They hold no business logic, only what is shown.

use crate::app::{ActiveMode, AppState};
use crate::domain::{Movie, PageSlot, PaginationInfo};

pub const APP_TITLE: &str = "Movie Mania";
pub const IDLE_TITLE: &str = "Search your movies and make them favourite";
pub const IDLE_SUBTITLE: &str = "Find your favourite titles, save them to watch later, and keep your collection in sync.";
pub const LOADING_MESSAGE: &str = "Searching movies...";
pub const EMPTY_MESSAGE: &str = "No movies found. Try another search.";

/// Poster value the catalog uses for titles without artwork.
const MISSING_POSTER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub search_bar: SearchBarInfo,
    /// Replaces the result grid when set.
    pub status: Option<StatusMessage>,
    pub rows: Vec<MovieRow>,
    pub pagination: Option<PaginationBar>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// `username <email>` of the signed-in user.
    pub user: Option<String>,
    pub viewing_favorites: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub year: Option<String>,
    pub kind: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    Loading,
    Error,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
    pub subtitle: Option<String>,
}

impl StatusMessage {
    fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            subtitle: None,
        }
    }
}

/// One title card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRow {
    pub id: String,
    pub title: String,
    pub year: String,
    pub kind: &'static str,
    /// `None` when the catalog has no artwork.
    pub poster: Option<String>,
    pub is_favorite: bool,
    /// Label of the favourite button.
    pub favorite_action: &'static str,
}

impl From<&Movie> for MovieRow {
    fn from(movie: &Movie) -> Self {
        let poster = Some(movie.poster_url.trim())
            .filter(|p| !p.is_empty() && *p != MISSING_POSTER)
            .map(String::from);

        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            kind: movie.kind.as_str(),
            poster,
            is_favorite: movie.is_favorite,
            favorite_action: if movie.is_favorite {
                "Remove from favourites"
            } else {
                "Add to favourites"
            },
        }
    }
}

/// Pagination controls; absent for single-page results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationBar {
    pub current: u32,
    pub total_pages: u32,
    pub slots: Vec<PageSlot>,
    /// Navigation is disabled while a request is in flight.
    pub can_previous: bool,
    pub can_next: bool,
}

impl PaginationBar {
    fn from_info(info: &PaginationInfo, is_loading: bool) -> Option<Self> {
        if info.total_pages <= 1 {
            return None;
        }
        Some(Self {
            current: info.page,
            total_pages: info.total_pages,
            slots: info.visible_pages(),
            can_previous: info.has_previous() && !is_loading,
            can_next: info.has_next() && !is_loading,
        })
    }
}

impl AppState {
    /// Computes the view model for the current state.
    ///
    /// Status precedence: nothing searched yet, then loading, then error, then an
    /// empty listing. Rows and pagination are only shown when no status applies.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let header = HeaderInfo {
            title: APP_TITLE.to_string(),
            user: self
                .auth
                .user
                .as_ref()
                .map(|user| format!("{} <{}>", user.username, user.email)),
            viewing_favorites: self.active_mode == ActiveMode::Favorites,
        };

        let search_bar = SearchBarInfo {
            query: self.draft.query.clone(),
            year: self.draft.year.clone().filter(|y| !y.trim().is_empty()),
            kind: self.draft.kind.map(|k| k.as_str()),
        };

        let status = if !self.has_searched {
            Some(StatusMessage {
                subtitle: Some(IDLE_SUBTITLE.to_string()),
                ..StatusMessage::new(StatusKind::Idle, IDLE_TITLE)
            })
        } else if self.is_loading {
            Some(StatusMessage::new(StatusKind::Loading, LOADING_MESSAGE))
        } else if let Some(error) = &self.error {
            Some(StatusMessage::new(StatusKind::Error, error.clone()))
        } else if self.movies.is_empty() {
            Some(StatusMessage::new(StatusKind::Empty, EMPTY_MESSAGE))
        } else {
            None
        };

        let (rows, pagination) = if status.is_some() {
            (vec![], None)
        } else {
            (
                self.movies.iter().map(MovieRow::from).collect(),
                self.pagination
                    .as_ref()
                    .and_then(|info| PaginationBar::from_info(info, self.is_loading)),
            )
        };

        UIViewModel {
            header,
            search_bar,
            status,
            rows,
            pagination,
        }
    }
}
