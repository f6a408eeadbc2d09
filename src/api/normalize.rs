//! Normalization of heterogeneous backend responses into canonical types.
//!
//! Several response envelopes coexist on the backend. Listing responses are
//! recognised by an ordered table of shape matchers; the first matcher that
//! accepts the payload wins, and a payload no matcher accepts becomes an empty
//! page instead of an error. Adding a new envelope means appending a matcher to
//! [`SHAPE_MATCHERS`], never touching the existing ones.
//!
//! # Recognised listing shapes (priority order)
//!
//! ```text
//! [ {..}, {..} ]                              bare array
//! { "movies": [..], "pagination": {..} }      direct movies field
//! { "data": { "movies": [..] } }              nested data.movies
//! { "data": { "favorites": [..] } }           nested data.favorites
//! { "data": { "movies": { "Search": [..] } } } legacy Search wrapper
//! { "Search": [..], "totalResults": "42" }    raw Search wrapper
//! ```

use crate::api::models::{FavoriteState, LoginEnvelope, MoviePage};
use crate::domain::{Credentials, Movie, MovieType, PaginationInfo};
use serde_json::{Map, Value};

/// Page size of the legacy `Search` wrapper, which reports only a result total.
const LEGACY_PAGE_SIZE: u32 = 10;

/// Records and paging hints located by a shape matcher.
struct MatchedShape<'a> {
    records: &'a [Value],
    pagination: Option<&'a Value>,
    legacy_total: Option<&'a Value>,
}

type ShapeMatcher = for<'a> fn(&'a Value) -> Option<MatchedShape<'a>>;

/// Listing shapes in priority order.
const SHAPE_MATCHERS: &[(&str, ShapeMatcher)] = &[
    ("bare_array", match_bare_array),
    ("movies", match_movies_field),
    ("data.movies", match_data_movies),
    ("data.favorites", match_data_favorites),
    ("data.movies.Search", match_data_movies_search),
    ("Search", match_search_field),
];

fn match_bare_array(value: &Value) -> Option<MatchedShape<'_>> {
    let records = value.as_array()?;
    Some(MatchedShape {
        records,
        pagination: None,
        legacy_total: None,
    })
}

fn match_movies_field(value: &Value) -> Option<MatchedShape<'_>> {
    let records = value.get("movies")?.as_array()?;
    Some(MatchedShape {
        records,
        pagination: first_object([value.get("pagination"), value.pointer("/data/pagination")]),
        legacy_total: None,
    })
}

fn match_data_movies(value: &Value) -> Option<MatchedShape<'_>> {
    let records = value.pointer("/data/movies")?.as_array()?;
    Some(MatchedShape {
        records,
        pagination: first_object([value.pointer("/data/pagination"), value.get("pagination")]),
        legacy_total: None,
    })
}

fn match_data_favorites(value: &Value) -> Option<MatchedShape<'_>> {
    let records = value.pointer("/data/favorites")?.as_array()?;
    Some(MatchedShape {
        records,
        pagination: first_object([value.pointer("/data/pagination"), value.get("pagination")]),
        legacy_total: None,
    })
}

fn match_data_movies_search(value: &Value) -> Option<MatchedShape<'_>> {
    let records = value.pointer("/data/movies/Search")?.as_array()?;
    Some(MatchedShape {
        records,
        pagination: first_object([
            value.pointer("/data/movies/pagination"),
            value.pointer("/data/pagination"),
            value.get("pagination"),
        ]),
        legacy_total: value.pointer("/data/movies/totalResults"),
    })
}

fn match_search_field(value: &Value) -> Option<MatchedShape<'_>> {
    let records = value.get("Search")?.as_array()?;
    Some(MatchedShape {
        records,
        pagination: first_object([value.get("pagination")]),
        legacy_total: value.get("totalResults"),
    })
}

fn first_object<const N: usize>(candidates: [Option<&Value>; N]) -> Option<&Value> {
    candidates.into_iter().flatten().find(|v| v.is_object())
}

/// Converts any known listing envelope into a [`MoviePage`].
///
/// `requested_page` is only consulted when paging has to be derived from a legacy
/// result total; explicit pagination objects and the single-page fallback ignore it.
///
/// # Examples
///
/// ```
/// use movie_mania::api::normalize::normalize_movie_page;
/// use serde_json::json;
///
/// let page = normalize_movie_page(&json!([{ "imdbID": "tt1", "Title": "Heat" }]), 1);
/// assert_eq!(page.movies.len(), 1);
/// assert_eq!(page.pagination.total_pages, 1);
/// ```
#[must_use]
pub fn normalize_movie_page(value: &Value, requested_page: u32) -> MoviePage {
    let Some((shape_name, shape)) = SHAPE_MATCHERS
        .iter()
        .find_map(|(name, matcher)| matcher(value).map(|shape| (*name, shape)))
    else {
        tracing::debug!("unrecognised listing shape, treating as empty result");
        return MoviePage::empty();
    };

    let movies: Vec<Movie> = shape.records.iter().filter_map(normalize_movie).collect();
    let count = u32::try_from(movies.len()).unwrap_or(u32::MAX);

    let skipped = shape.records.len() - movies.len();
    if skipped > 0 {
        tracing::debug!(skipped, "dropped records without an identifier");
    }

    let pagination = shape
        .pagination
        .and_then(|p| parse_pagination(p, count))
        .or_else(|| shape.legacy_total.and_then(|t| legacy_pagination(t, requested_page)))
        .unwrap_or_else(|| PaginationInfo::single_page(count));

    tracing::debug!(
        shape = shape_name,
        movie_count = movies.len(),
        page = pagination.page,
        total_pages = pagination.total_pages,
        "listing normalized"
    );

    MoviePage { movies, pagination }
}

/// Normalizes a single raw movie record.
///
/// Accepts the legacy capitalised field names and their camel-case equivalents.
/// A missing type defaults to `movie`; the favourite flag coalesces
/// `isFavorite`, then `isFavourite`, then `false`. Returns `None` for records
/// without an identifier.
#[must_use]
pub fn normalize_movie(raw: &Value) -> Option<Movie> {
    let obj = raw.as_object()?;
    let id = first_string(obj, &["imdbID", "imdbId", "id", "movieId"]).filter(|id| !id.is_empty())?;

    Some(Movie {
        title: first_string(obj, &["Title", "title"]).unwrap_or_default(),
        year: first_string(obj, &["Year", "year"]).unwrap_or_default(),
        id,
        kind: first_string(obj, &["Type", "type"])
            .and_then(|t| MovieType::parse(&t))
            .unwrap_or_default(),
        poster_url: first_string(obj, &["Poster", "poster", "posterUrl"]).unwrap_or_default(),
        is_favorite: favorite_flag(obj).unwrap_or(false),
    })
}

/// Resolves the server-confirmed favourite flag after an add/remove/toggle call.
///
/// The flag falls back to the inverse of `currently_favorite` when the response
/// does not carry one, and the identifier falls back to `requested_id`.
#[must_use]
pub fn normalize_favorite_state(value: &Value, requested_id: &str, currently_favorite: bool) -> FavoriteState {
    let obj = value
        .get("data")
        .and_then(Value::as_object)
        .or_else(|| value.as_object());

    let (movie_id, is_favorite) = obj.map_or((None, None), |obj| {
        (first_string(obj, &["imdbID", "movieId"]), favorite_flag(obj))
    });

    FavoriteState {
        movie_id: movie_id.unwrap_or_else(|| requested_id.to_string()),
        is_favorite: is_favorite.unwrap_or(!currently_favorite),
    }
}

/// Extracts credentials from an OAuth callback response.
///
/// Returns `None` unless a user and both tokens are present.
#[must_use]
pub fn normalize_login(value: &Value) -> Option<Credentials> {
    let envelope: LoginEnvelope = serde_json::from_value(value.clone()).ok()?;

    let nested = envelope.data.and_then(|d| d.user);
    let (user, access_token, refresh_token) = match nested {
        Some(mut user) => {
            let access = user.access_token.take();
            let refresh = user.refresh_token.take();
            (user, access, refresh)
        }
        None => {
            let mut user = envelope.user?;
            let access = envelope.access_token.or_else(|| user.access_token.take());
            let refresh = envelope.refresh_token.or_else(|| user.refresh_token.take());
            (user, access, refresh)
        }
    };

    Some(Credentials {
        user: user.into_user(),
        access_token: access_token.filter(|t| !t.is_empty())?,
        refresh_token: refresh_token.filter(|t| !t.is_empty())?,
    })
}

fn favorite_flag(obj: &Map<String, Value>) -> Option<bool> {
    obj.get("isFavorite")
        .and_then(Value::as_bool)
        .or_else(|| obj.get("isFavourite").and_then(Value::as_bool))
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_u32(obj: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|key| as_u32(obj.get(*key)?))
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads an explicit pagination object, filling gaps from the page's movie count.
fn parse_pagination(value: &Value, count: u32) -> Option<PaginationInfo> {
    let obj = value.as_object()?;

    let per_page = first_u32(obj, &["perPage", "limit", "pageSize"]).unwrap_or(count);
    let total_results = first_u32(obj, &["totalResults", "total"]).unwrap_or(count);
    let total_pages = first_u32(obj, &["totalPages"])
        .unwrap_or_else(|| pages_for(total_results, per_page))
        .max(1);
    let page = first_u32(obj, &["page", "currentPage"])
        .unwrap_or(1)
        .clamp(1, total_pages);

    Some(PaginationInfo {
        page,
        per_page,
        total_results,
        total_pages,
    })
}

/// Derives paging from the string `totalResults` of the legacy `Search` wrapper.
fn legacy_pagination(total: &Value, requested_page: u32) -> Option<PaginationInfo> {
    let total_results = as_u32(total)?;
    let total_pages = pages_for(total_results, LEGACY_PAGE_SIZE).max(1);

    Some(PaginationInfo {
        page: requested_page.clamp(1, total_pages),
        per_page: LEGACY_PAGE_SIZE,
        total_results,
        total_pages,
    })
}

const fn pages_for(total_results: u32, per_page: u32) -> u32 {
    if per_page == 0 {
        1
    } else {
        total_results.div_ceil(per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> Value {
        json!({ "imdbID": id, "Title": format!("Title {id}"), "Year": "1999", "Type": "movie", "Poster": "N/A" })
    }

    #[test]
    fn bare_array_without_pagination_synthesizes_single_page() {
        let page = normalize_movie_page(&json!([record("tt1"), record("tt2"), record("tt3")]), 1);

        assert_eq!(page.movies.len(), 3);
        assert_eq!(page.pagination, PaginationInfo::single_page(3));
    }

    #[test]
    fn direct_movies_field_reads_pagination() {
        let body = json!({
            "movies": [record("tt1"), record("tt2")],
            "pagination": { "page": 2, "perPage": 2, "totalResults": 6, "totalPages": 3 }
        });
        let page = normalize_movie_page(&body, 2);

        assert_eq!(page.movies.len(), 2);
        assert_eq!(
            page.pagination,
            PaginationInfo { page: 2, per_page: 2, total_results: 6, total_pages: 3 }
        );
    }

    #[test]
    fn nested_data_movies_array_is_recognised() {
        let body = json!({ "success": true, "data": { "movies": [record("tt9")] } });
        let page = normalize_movie_page(&body, 1);

        assert_eq!(page.movies[0].id, "tt9");
    }

    #[test]
    fn nested_data_favorites_array_is_recognised() {
        let body = json!({ "data": { "favorites": [record("tt5"), record("tt6")] } });
        assert_eq!(normalize_movie_page(&body, 1).movies.len(), 2);
    }

    #[test]
    fn legacy_search_wrapper_derives_pages_from_total() {
        let records: Vec<Value> = (0..10).map(|i| record(&format!("tt{i}"))).collect();
        let body = json!({
            "success": true,
            "data": { "movies": { "Search": records, "totalResults": "25", "Response": "True" } }
        });
        let page = normalize_movie_page(&body, 3);

        assert_eq!(page.movies.len(), 10);
        assert_eq!(
            page.pagination,
            PaginationInfo { page: 3, per_page: 10, total_results: 25, total_pages: 3 }
        );
    }

    #[test]
    fn top_level_search_field_derives_pages_from_total() {
        let body = json!({
            "Search": [record("tt1"), record("tt2"), record("bad")],
            "totalResults": "42",
            "Response": "True"
        });
        let page = normalize_movie_page(&body, 2);

        assert_eq!(page.movies.len(), 3);
        assert_eq!(page.movies[0].id, "tt1");
        assert_eq!(
            page.pagination,
            PaginationInfo { page: 2, per_page: 10, total_results: 42, total_pages: 5 }
        );

        let beyond = normalize_movie_page(&body, 9);
        assert_eq!(beyond.pagination.page, 5);
    }

    #[test]
    fn direct_movies_field_wins_over_nested_data() {
        let body = json!({
            "movies": [record("direct")],
            "data": { "movies": [record("nested1"), record("nested2")] }
        });
        let page = normalize_movie_page(&body, 1);

        assert_eq!(page.movies.len(), 1);
        assert_eq!(page.movies[0].id, "direct");
    }

    #[test]
    fn unknown_shapes_become_empty_pages() {
        for body in [json!({ "unexpected": true }), json!("nope"), Value::Null, json!({ "movies": "x" })] {
            let page = normalize_movie_page(&body, 1);
            assert!(page.movies.is_empty());
            assert_eq!(page.pagination, PaginationInfo::single_page(0));
        }
    }

    #[test]
    fn record_defaults_type_and_coalesces_favourite_spellings() {
        let movie = normalize_movie(&json!({ "id": "tt1", "title": "Up", "isFavourite": true })).unwrap();
        assert_eq!(movie.kind, MovieType::Movie);
        assert!(movie.is_favorite);

        let movie = normalize_movie(&json!({ "id": "tt1", "isFavorite": false, "isFavourite": true })).unwrap();
        assert!(!movie.is_favorite);

        let movie = normalize_movie(&json!({ "id": "tt1", "Type": "series" })).unwrap();
        assert_eq!(movie.kind, MovieType::Series);
        assert!(!movie.is_favorite);
    }

    #[test]
    fn record_without_identifier_is_skipped() {
        assert!(normalize_movie(&json!({ "Title": "Nameless" })).is_none());
        assert!(normalize_movie(&json!({ "imdbID": "" })).is_none());

        let page = normalize_movie_page(&json!([{ "Title": "x" }, record("tt1")]), 1);
        assert_eq!(page.movies.len(), 1);
    }

    #[test]
    fn numeric_year_is_accepted() {
        let movie = normalize_movie(&json!({ "id": 42, "year": 1984 })).unwrap();
        assert_eq!(movie.id, "42");
        assert_eq!(movie.year, "1984");
    }

    #[test]
    fn partial_pagination_is_completed_and_clamped() {
        let body = json!({ "movies": [record("a"), record("b")], "pagination": { "page": "9", "limit": 2, "total": 5 } });
        let page = normalize_movie_page(&body, 1);

        assert_eq!(
            page.pagination,
            PaginationInfo { page: 3, per_page: 2, total_results: 5, total_pages: 3 }
        );
    }

    #[test]
    fn favorite_state_prefers_server_values() {
        let state = normalize_favorite_state(&json!({ "movieId": "tt2", "isFavourite": true }), "tt1", false);
        assert_eq!(state, FavoriteState { movie_id: "tt2".into(), is_favorite: true });

        let state = normalize_favorite_state(&json!({ "data": { "imdbID": "tt3", "isFavorite": false } }), "tt1", true);
        assert_eq!(state, FavoriteState { movie_id: "tt3".into(), is_favorite: false });
    }

    #[test]
    fn favorite_state_falls_back_to_inverse_of_current() {
        let state = normalize_favorite_state(&json!({ "success": true }), "tt1", true);
        assert_eq!(state, FavoriteState { movie_id: "tt1".into(), is_favorite: false });
    }

    #[test]
    fn login_accepts_legacy_envelope() {
        let body = json!({
            "success": true,
            "message": "ok",
            "data": { "user": {
                "id": "u1", "userName": "ada", "email": "ada@example.com",
                "profilePicUrl": "https://pic", "accessToken": "a", "refreshToken": "r"
            } }
        });
        let credentials = normalize_login(&body).unwrap();

        assert_eq!(credentials.user.username, "ada");
        assert_eq!(credentials.user.profile_pic, "https://pic");
        assert_eq!(credentials.access_token, "a");
        assert_eq!(credentials.refresh_token, "r");
    }

    #[test]
    fn login_accepts_canonical_envelope() {
        let body = json!({
            "user": { "id": "u1", "username": "ada", "email": "e" },
            "accessToken": "a",
            "refreshToken": "r"
        });
        assert_eq!(normalize_login(&body).unwrap().user.id, "u1");
    }

    #[test]
    fn login_without_tokens_is_rejected() {
        let body = json!({ "data": { "user": { "id": "u1", "userName": "ada", "accessToken": "a" } } });
        assert!(normalize_login(&body).is_none());
        assert!(normalize_login(&json!({ "success": false })).is_none());
    }
}
