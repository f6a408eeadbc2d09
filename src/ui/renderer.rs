//! Plain-text rendering of the view model.
//!
//! ```text
//! Movie Mania                                   signed in as ada <ada@example.com>
//! Search: heat  [year: 1995] [type: movie]
//!
//!  ♥ Heat (1995) movie  tt0113277
//!    Heat Wave (2009) movie  tt1234567  [no poster]
//!
//! < Prev  [1] 2 3 ... 9  Next >
//! ```

use crate::app::AppState;
use crate::domain::PageSlot;
use crate::ui::viewmodel::{MovieRow, PaginationBar, UIViewModel};
use std::fmt::Write;

/// Renders the current state as text.
#[must_use]
pub fn render(state: &AppState) -> String {
    render_viewmodel(&state.compute_viewmodel())
}

#[must_use]
pub fn render_viewmodel(vm: &UIViewModel) -> String {
    let mut out = String::new();

    out.push_str(&vm.header.title);
    if vm.header.viewing_favorites {
        out.push_str(" / Favourites");
    }
    if let Some(user) = &vm.header.user {
        let _ = write!(out, "  (signed in as {user})");
    }
    out.push('\n');

    let _ = write!(out, "Search: {}", vm.search_bar.query);
    if let Some(year) = &vm.search_bar.year {
        let _ = write!(out, "  [year: {year}]");
    }
    if let Some(kind) = vm.search_bar.kind {
        let _ = write!(out, "  [type: {kind}]");
    }
    out.push_str("\n\n");

    if let Some(status) = &vm.status {
        out.push_str(&status.message);
        out.push('\n');
        if let Some(subtitle) = &status.subtitle {
            out.push_str(subtitle);
            out.push('\n');
        }
        return out;
    }

    for row in &vm.rows {
        render_row(&mut out, row);
    }

    if let Some(bar) = &vm.pagination {
        out.push('\n');
        render_pagination(&mut out, bar);
    }

    out
}

fn render_row(out: &mut String, row: &MovieRow) {
    let heart = if row.is_favorite { '♥' } else { ' ' };
    let _ = write!(out, " {heart} {} ({}) {}  {}", row.title, row.year, row.kind, row.id);
    if row.poster.is_none() {
        out.push_str("  [no poster]");
    }
    out.push('\n');
}

fn render_pagination(out: &mut String, bar: &PaginationBar) {
    out.push_str(if bar.can_previous { "< Prev " } else { "  Prev " });
    for slot in &bar.slots {
        match slot {
            PageSlot::Page(page) if *page == bar.current => {
                let _ = write!(out, " [{page}]");
            }
            PageSlot::Page(page) => {
                let _ = write!(out, " {page}");
            }
            PageSlot::Ellipsis => out.push_str(" ..."),
        }
    }
    out.push_str(if bar.can_next { "  Next >" } else { "  Next  " });
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ActiveMode;
    use crate::domain::{Movie, MovieType, PaginationInfo};
    use crate::ui::viewmodel::{EMPTY_MESSAGE, IDLE_SUBTITLE, IDLE_TITLE, LOADING_MESSAGE};

    fn heat(is_favorite: bool) -> Movie {
        Movie {
            title: "Heat".into(),
            year: "1995".into(),
            id: "tt0113277".into(),
            kind: MovieType::Movie,
            poster_url: "N/A".into(),
            is_favorite,
        }
    }

    #[test]
    fn idle_view_shows_prompt() {
        let text = render(&AppState::default());
        assert!(text.starts_with("Movie Mania\n"));
        assert!(text.contains(IDLE_TITLE));
        assert!(text.contains(IDLE_SUBTITLE));
    }

    #[test]
    fn loading_and_empty_views() {
        let mut state = AppState {
            has_searched: true,
            is_loading: true,
            active_mode: ActiveMode::Search,
            ..AppState::default()
        };
        assert!(render(&state).contains(LOADING_MESSAGE));

        state.is_loading = false;
        assert!(render(&state).contains(EMPTY_MESSAGE));
    }

    #[test]
    fn results_with_pagination() {
        let state = AppState {
            movies: vec![heat(true)],
            pagination: Some(PaginationInfo {
                page: 5,
                per_page: 1,
                total_results: 9,
                total_pages: 9,
            }),
            has_searched: true,
            active_mode: ActiveMode::Search,
            ..AppState::default()
        };
        let text = render(&state);

        assert!(text.contains(" ♥ Heat (1995) movie  tt0113277  [no poster]\n"));
        assert!(text.contains("< Prev  1 ... 3 4 [5] 6 7 ... 9  Next >\n"));
    }

    #[test]
    fn favourites_header() {
        let state = AppState {
            movies: vec![heat(true)],
            has_searched: true,
            active_mode: ActiveMode::Favorites,
            ..AppState::default()
        };
        assert!(render(&state).starts_with("Movie Mania / Favourites\n"));
    }
}
