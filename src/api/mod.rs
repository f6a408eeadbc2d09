//! Backend API adapter.
//!
//! The coordinator never talks HTTP directly: every network call goes through the
//! [`MovieApi`] trait, whose production implementation is [`HttpMovieApi`]. All
//! responses are normalized into canonical domain types before they leave this
//! module, so callers never see the legacy envelopes.
//!
//! # Organization
//!
//! - [`client`]: `reqwest` wrapper with bearer-token injection and status mapping
//! - [`routes`]: Endpoint URLs resolved from the configured base
//! - [`models`]: Request bodies and canonical response types
//! - [`normalize`]: Ordered shape matchers for listing, favourite, and login responses
//! - [`service`]: [`HttpMovieApi`], the HTTP implementation of [`MovieApi`]

pub mod client;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod service;

pub use client::HttpClient;
pub use models::{FavoriteState, MoviePage};
pub use routes::Routes;
pub use service::HttpMovieApi;

use crate::domain::{Credentials, Result, SearchCriteria};
use async_trait::async_trait;

/// Operations the coordinator needs from the movie backend.
///
/// Implementations must be cheap to share across tasks; the runtime holds one
/// behind an `Arc` and calls it from many in-flight requests at once.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Searches the catalog. Unrecognised response shapes yield an empty page.
    async fn search(&self, criteria: &SearchCriteria) -> Result<MoviePage>;

    /// Lists the signed-in user's favourites. Every returned movie is marked favourite.
    async fn favorites(&self, page: u32) -> Result<MoviePage>;

    async fn add_favorite(&self, movie_id: &str) -> Result<FavoriteState>;

    async fn remove_favorite(&self, movie_id: &str) -> Result<FavoriteState>;

    /// Flips the favourite flag of one title.
    ///
    /// The default implementation issues an add or a remove depending on
    /// `currently_favorite`; backends with a unified toggle endpoint override it.
    async fn toggle_favorite(&self, movie_id: &str, currently_favorite: bool) -> Result<FavoriteState> {
        if currently_favorite {
            self.remove_favorite(movie_id).await
        } else {
            self.add_favorite(movie_id).await
        }
    }

    /// Exchanges an OAuth provider ID token for a session.
    async fn google_login(&self, google_token: &str) -> Result<Credentials>;

    /// Sets the access token attached to subsequent requests.
    ///
    /// Takes effect for every request started after it returns.
    fn set_access_token(&self, token: Option<String>);
}
