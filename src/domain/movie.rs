//! Movie catalog domain model.
//!
//! This module defines the canonical types every backend response is normalized
//! into ([`Movie`], [`PaginationInfo`]), the user's [`SearchCriteria`], and the
//! [`RequestFingerprint`] used to discard responses to superseded requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pages shown on each side of the current page in the pagination bar.
const PAGE_WINDOW: u32 = 2;

/// Category filter understood by the catalog backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieType {
    #[default]
    Movie,
    Series,
    Episode,
}

impl MovieType {
    /// Returns the wire name used in query strings and JSON payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }

    /// Parses a wire name case-insensitively.
    ///
    /// Returns `None` for anything that is not one of the three known categories.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Series),
            "episode" => Some(Self::Episode),
            _ => None,
        }
    }
}

impl fmt::Display for MovieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog title in canonical form.
///
/// `id` is the stable external identifier and uniquely identifies a title within a
/// result list. `is_favorite` is the only mutable field; it is reconciled from
/// server responses and never toggled optimistically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub year: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MovieType,
    pub poster_url: String,
    pub is_favorite: bool,
}

/// Search request as entered by the user.
///
/// `query` is the only mandatory field; an empty or whitespace-only query means
/// "no active search". `page` is 1-based and defaults to 1 when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovieType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl SearchCriteria {
    /// Creates criteria for a plain text query with no filters.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the year filter set.
    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Returns a copy with the category filter set.
    #[must_use]
    pub const fn with_kind(mut self, kind: MovieType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns a copy targeting the given page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Returns the effective 1-based page.
    #[must_use]
    pub fn page_or_default(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns `true` if the query contains no searchable text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Returns the canonical form sent to the backend.
    ///
    /// Trims the query and year, drops a blank year, and pins the page to an
    /// explicit value.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let year = self
            .year
            .as_deref()
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .map(String::from);

        Self {
            query: self.query.trim().to_string(),
            year,
            kind: self.kind,
            page: Some(self.page_or_default()),
        }
    }
}

/// Identity of a dispatched request, compared when its response arrives.
///
/// Built as an order-stable `|`-joined key so that equal criteria always produce
/// equal fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestFingerprint(String);

impl RequestFingerprint {
    /// Builds the fingerprint of a search request from `(trimmedQuery, year, type, page)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use movie_mania::domain::{MovieType, RequestFingerprint, SearchCriteria};
    ///
    /// let criteria = SearchCriteria::new("  batman ").with_kind(MovieType::Movie);
    /// assert_eq!(RequestFingerprint::for_search(&criteria).as_str(), "batman||movie|1");
    /// ```
    #[must_use]
    pub fn for_search(criteria: &SearchCriteria) -> Self {
        let normalized = criteria.normalized();
        let key = [
            normalized.query.as_str(),
            normalized.year.as_deref().unwrap_or(""),
            normalized.kind.map_or("", MovieType::as_str),
            &normalized.page_or_default().to_string(),
        ]
        .join("|");
        Self(key)
    }

    /// Builds the fingerprint of a favourites listing request.
    #[must_use]
    pub fn for_favorites(page: u32) -> Self {
        Self(format!("favorites|{}", page.max(1)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paging metadata for a result list.
///
/// Invariant: `1 <= page <= total_pages` whenever `total_pages >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub per_page: u32,
    pub total_results: u32,
    pub total_pages: u32,
}

/// One slot of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

impl PaginationInfo {
    /// Synthesizes single-page metadata for a response that carried none.
    ///
    /// # Examples
    ///
    /// ```
    /// use movie_mania::domain::PaginationInfo;
    ///
    /// let info = PaginationInfo::single_page(7);
    /// assert_eq!((info.page, info.per_page, info.total_results, info.total_pages), (1, 7, 7, 1));
    /// ```
    #[must_use]
    pub const fn single_page(count: u32) -> Self {
        Self {
            page: 1,
            per_page: count,
            total_results: count,
            total_pages: 1,
        }
    }

    /// Returns `true` if `page` is a valid target for this result set.
    #[must_use]
    pub const fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Computes the page buttons to display.
    ///
    /// Always shows the first and last page, plus a window of two pages on each
    /// side of the current one; skipped runs collapse into [`PageSlot::Ellipsis`].
    /// Returns an empty list when there is only one page.
    #[must_use]
    pub fn visible_pages(&self) -> Vec<PageSlot> {
        let (page, total) = (self.page, self.total_pages);
        if total <= 1 {
            return vec![];
        }

        let mut slots = vec![PageSlot::Page(1)];
        if page.saturating_sub(PAGE_WINDOW) > 2 {
            slots.push(PageSlot::Ellipsis);
        }

        let start = page.saturating_sub(PAGE_WINDOW).max(2);
        let end = (page + PAGE_WINDOW).min(total - 1);
        slots.extend((start..=end).map(PageSlot::Page));

        if page + PAGE_WINDOW < total - 1 {
            slots.push(PageSlot::Ellipsis);
        }
        slots.push(PageSlot::Page(total));

        slots
    }
}
