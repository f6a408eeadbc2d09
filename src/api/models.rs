//! Request bodies and canonical response types of the HTTP contract.
//!
//! Raw responses arrive in several legacy envelopes and are converted by
//! [`crate::api::normalize`] into the types defined here before they leave the
//! API layer.

use crate::domain::{AuthUser, Movie, PaginationInfo};
use serde::{Deserialize, Serialize};

/// Canonical result of a search or favourites listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePage {
    /// Titles on the requested page, in server order.
    pub movies: Vec<Movie>,

    /// Paging metadata. Synthesized as a single page when the server sent none.
    pub pagination: PaginationInfo,
}

impl MoviePage {
    /// A page with no titles.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            movies: Vec::new(),
            pagination: PaginationInfo::single_page(0),
        }
    }
}

/// Canonical favourite flag for one title, as confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteState {
    pub movie_id: String,
    pub is_favorite: bool,
}

/// Body of `POST /google/callback`.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleCallbackRequest<'a> {
    /// ID token issued to the browser by the OAuth provider.
    pub token: &'a str,
}

/// User object of the OAuth callback response.
///
/// The legacy envelope nests the token pair inside the user object and spells the
/// name and picture fields `userName` / `profilePicUrl`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "userName")]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "profilePicUrl")]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl RawUser {
    pub(crate) fn into_user(self) -> AuthUser {
        AuthUser {
            id: self.id.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            profile_pic: self.profile_pic.unwrap_or_default(),
        }
    }
}

/// Envelope of the OAuth callback response, covering both the legacy
/// `{ success, message, data: { user } }` shape and the canonical
/// `{ user, accessToken, refreshToken }` shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginEnvelope {
    #[serde(default)]
    pub data: Option<LoginData>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LoginData {
    #[serde(default)]
    pub user: Option<RawUser>,
}
