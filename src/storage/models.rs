//! Storage record models for the persistence layer.
//!
//! These types are separate from domain models to keep the on-disk
//! representation independent of in-memory state.

use crate::domain::error::Result;
use crate::domain::{AuthState, AuthUser};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};

/// Persisted form of a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,

    /// Unix timestamp of the last write.
    pub saved_at: i64,
}

impl SessionRecord {
    /// Captures an authenticated session; returns `None` for a signed-out one.
    #[must_use]
    pub fn from_state(state: &AuthState) -> Option<Self> {
        Some(Self {
            user: state.user.clone()?,
            access_token: state.access_token.clone()?,
            refresh_token: state.refresh_token.clone().unwrap_or_default(),
            saved_at: chrono::Utc::now().timestamp(),
        })
    }

    #[must_use]
    pub fn into_state(self) -> AuthState {
        AuthState {
            user: Some(self.user),
            access_token: Some(self.access_token),
            refresh_token: Some(self.refresh_token).filter(|t| !t.is_empty()),
        }
    }
}

/// Reads the session stored under `key`.
///
/// A missing, unreadable, or unparsable record yields the signed-out state.
pub fn load_session(storage: &dyn Storage, key: &str) -> AuthState {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AuthState::default(),
        Err(e) => {
            tracing::debug!(error = %e, "session record unreadable");
            return AuthState::default();
        }
    };

    match serde_json::from_str::<SessionRecord>(&raw) {
        Ok(record) => {
            tracing::debug!(user_id = %record.user.id, saved_at = record.saved_at, "session rehydrated");
            record.into_state()
        }
        Err(e) => {
            tracing::debug!(error = %e, "session record unparsable");
            AuthState::default()
        }
    }
}

/// Writes `state` under `key`, or removes the key when signed out.
///
/// # Errors
///
/// Returns an error if the backend write fails.
pub fn save_session(storage: &mut dyn Storage, key: &str, state: &AuthState) -> Result<()> {
    match SessionRecord::from_state(state) {
        Some(record) => storage.set_item(key, &serde_json::to_string(&record)?),
        None => storage.remove_item(key),
    }
}
