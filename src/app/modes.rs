//! Mode and phase types of the search coordinator.
//!
//! [`ActiveMode`] is stored state: it records which listing the visible results
//! belong to and therefore where page changes are routed. [`Phase`] is derived
//! from the whole [`AppState`](super::AppState) on demand and names the state of
//! the coordinator's state machine:
//!
//! ```text
//!            submit(query)              resolve(ok, latest)
//!   Idle ───────────────▶ Searching ─────────────────────▶ ResultsReady | ResultsEmpty
//!    ▲                      │  ▲                              │
//!    │ submit("")           │  │ changePage(n)                │
//!    └──────── any ◀────────┘  └──────────────────────────────┘
//!                           │ resolve(err, latest)
//!                           ▼
//!                        Errored
//!
//!   any ── showFavorites(page) ──▶ Searching ──▶ ViewingFavorites
//! ```

/// Which listing the visible results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveMode {
    /// No active listing; results are empty.
    #[default]
    Idle,

    /// Catalog search; page changes replay the last criteria.
    Search,

    /// Favourites listing; page changes refetch favourites.
    Favorites,
}

/// State of the coordinator's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A listing request is in flight.
    Searching,
    ResultsReady,
    ResultsEmpty,
    Errored,
    ViewingFavorites,
}

impl Phase {
    /// Returns `true` if results (possibly empty) are on screen.
    #[must_use]
    pub const fn has_results(self) -> bool {
        matches!(self, Self::ResultsReady | Self::ResultsEmpty | Self::ViewingFavorites)
    }
}
