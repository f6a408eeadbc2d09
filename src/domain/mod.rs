//! Domain layer for the Movie Mania client.
//!
//! This module contains the core domain types, independent of HTTP, storage, or
//! runtime concerns. Every backend response shape is normalized into these types
//! before it reaches application state.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`movie`]: Movies, search criteria, pagination, and request fingerprints
//! - [`user`]: Authenticated user and session state
//!
//! # Examples
//!
//! ```
//! use movie_mania::domain::{RequestFingerprint, SearchCriteria};
//!
//! let criteria = SearchCriteria::new("batman").with_page(3);
//! assert_eq!(RequestFingerprint::for_search(&criteria).as_str(), "batman|||3");
//! ```

pub mod error;
pub mod movie;
pub mod user;

pub use error::{MovieManiaError, Result};
pub use movie::{Movie, MovieType, PageSlot, PaginationInfo, RequestFingerprint, SearchCriteria};
pub use user::{AuthState, AuthUser, Credentials};
