//! Infrastructure layer for timing and filesystem concerns.
//!
//! - [`debounce`]: Trailing-edge [`Debouncer`] for the free-text search path
//! - [`paths`]: Per-user data directory resolution

pub mod debounce;
pub mod paths;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use paths::{expand_tilde, get_data_dir};
