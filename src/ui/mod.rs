//! Presentation layer.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Status message, movie rows, and pagination bar derived from state
//! - [`renderer`]: Plain-text rendering of the view model

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use viewmodel::{
    HeaderInfo, MovieRow, PaginationBar, SearchBarInfo, StatusKind, StatusMessage, UIViewModel,
};
