//! Endpoint table derived from the configured base URL.

use crate::domain::error::Result;
use url::Url;

/// Absolute endpoint URLs of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub search: Url,
    pub favorites: Url,
    pub google_callback: Url,
    /// Unified toggle endpoint, when the backend exposes one.
    pub favorites_toggle: Option<Url>,
}

impl Routes {
    /// Resolves every endpoint relative to `base_url`.
    ///
    /// The base may carry a path prefix (e.g. `/api`) with or without a trailing
    /// slash; it is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` or `favorites_toggle_path` is not a valid URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use movie_mania::api::Routes;
    ///
    /// let routes = Routes::new("http://localhost:3000/api", None)?;
    /// assert_eq!(routes.search.as_str(), "http://localhost:3000/api/movies/search");
    /// # Ok::<(), movie_mania::MovieManiaError>(())
    /// ```
    pub fn new(base_url: &str, favorites_toggle_path: Option<&str>) -> Result<Self> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let join = |path: &str| base.join(path.trim_start_matches('/'));

        Ok(Self {
            search: join("movies/search")?,
            favorites: join("movies/favorites")?,
            google_callback: join("google/callback")?,
            favorites_toggle: favorites_toggle_path.map(join).transpose()?,
        })
    }
}
