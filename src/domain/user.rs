//! Authenticated user and session state.
//!
//! [`AuthState`] is the process-wide session: rehydrated once from local storage at
//! startup and afterwards mutated only through login, token refresh, and logout.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user as reported by the OAuth callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic: String,
}

/// Result of a successful OAuth exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Current authentication session.
///
/// The default value is the unauthenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl AuthState {
    /// Returns `true` if a user is signed in with an access token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    /// Replaces the session with freshly issued credentials.
    pub fn apply(&mut self, credentials: Credentials) {
        self.user = Some(credentials.user);
        self.access_token = Some(credentials.access_token);
        self.refresh_token = Some(credentials.refresh_token);
    }

    /// Rotates the token pair, keeping the current user.
    pub fn update_tokens(&mut self, access_token: String, refresh_token: String) {
        self.access_token = Some(access_token);
        self.refresh_token = Some(refresh_token);
    }

    /// Signs out.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
