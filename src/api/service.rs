//! HTTP implementation of [`MovieApi`].
//!
//! | Operation        | Method | Path                | Parameters                     |
//! |------------------|--------|---------------------|--------------------------------|
//! | search           | GET    | `/movies/search`    | `query, year?, type?, page?`   |
//! | favorites        | GET    | `/movies/favorites` | `page?`                        |
//! | add favorite     | POST   | `/movies/favorites` | `movieId`                      |
//! | remove favorite  | DELETE | `/movies/favorites` | `movieId`                      |
//! | google login     | POST   | `/google/callback`  | `{ token }`                    |

use crate::api::client::HttpClient;
use crate::api::models::{FavoriteState, GoogleCallbackRequest, MoviePage};
use crate::api::normalize::{normalize_favorite_state, normalize_login, normalize_movie_page};
use crate::api::routes::Routes;
use crate::api::MovieApi;
use crate::domain::{Credentials, MovieManiaError, Result, SearchCriteria};
use crate::Config;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug_span;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct HttpMovieApi {
    client: HttpClient,
    routes: Routes,
}

impl HttpMovieApi {
    #[must_use]
    pub const fn new(client: HttpClient, routes: Routes) -> Self {
        Self { client, routes }
    }

    /// Builds the client and route table from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or toggle path is invalid, or the HTTP
    /// client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let routes = Routes::new(&config.api_base_url, config.favorites_toggle_path.as_deref())?;
        let client = HttpClient::new(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::new(client, routes))
    }

    #[must_use]
    pub const fn routes(&self) -> &Routes {
        &self.routes
    }

    fn search_query(criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
        let criteria = criteria.normalized();
        let mut query = vec![("query", criteria.query.clone())];
        if let Some(year) = &criteria.year {
            query.push(("year", year.clone()));
        }
        if let Some(kind) = criteria.kind {
            query.push(("type", kind.as_str().to_string()));
        }
        query.push(("page", criteria.page_or_default().to_string()));
        query
    }
}

#[async_trait]
impl MovieApi for HttpMovieApi {
    async fn search(&self, criteria: &SearchCriteria) -> Result<MoviePage> {
        let page = criteria.page_or_default();
        let span = debug_span!("api_search", query = %criteria.query.trim(), page);
        async {
            let body = self.client.get(&self.routes.search, &Self::search_query(criteria)).await?;
            Ok(normalize_movie_page(&body, page))
        }
        .instrument(span)
        .await
    }

    async fn favorites(&self, page: u32) -> Result<MoviePage> {
        let page = page.max(1);
        let span = debug_span!("api_favorites", page);
        async {
            let body = self.client.get(&self.routes.favorites, &[("page", page.to_string())]).await?;
            let mut listing = normalize_movie_page(&body, page);
            for movie in &mut listing.movies {
                movie.is_favorite = true;
            }
            Ok(listing)
        }
        .instrument(span)
        .await
    }

    async fn add_favorite(&self, movie_id: &str) -> Result<FavoriteState> {
        let span = debug_span!("api_add_favorite", movie_id);
        async {
            let body = self
                .client
                .post::<Value>(&self.routes.favorites, &[("movieId", movie_id.to_string())], None)
                .await?;
            Ok(normalize_favorite_state(&body, movie_id, false))
        }
        .instrument(span)
        .await
    }

    async fn remove_favorite(&self, movie_id: &str) -> Result<FavoriteState> {
        let span = debug_span!("api_remove_favorite", movie_id);
        async {
            let body = self
                .client
                .delete(&self.routes.favorites, &[("movieId", movie_id.to_string())])
                .await?;
            Ok(normalize_favorite_state(&body, movie_id, true))
        }
        .instrument(span)
        .await
    }

    async fn toggle_favorite(&self, movie_id: &str, currently_favorite: bool) -> Result<FavoriteState> {
        let Some(toggle) = &self.routes.favorites_toggle else {
            return if currently_favorite {
                self.remove_favorite(movie_id).await
            } else {
                self.add_favorite(movie_id).await
            };
        };

        let span = debug_span!("api_toggle_favorite", movie_id, currently_favorite);
        async {
            let body = self
                .client
                .post::<Value>(toggle, &[("movieId", movie_id.to_string())], None)
                .await?;
            Ok(normalize_favorite_state(&body, movie_id, currently_favorite))
        }
        .instrument(span)
        .await
    }

    async fn google_login(&self, google_token: &str) -> Result<Credentials> {
        let span = debug_span!("api_google_login");
        async {
            let request = GoogleCallbackRequest { token: google_token };
            let body = self
                .client
                .post(&self.routes.google_callback, &[], Some(&request))
                .await?;
            normalize_login(&body)
                .ok_or_else(|| MovieManiaError::Auth("login response carried no session tokens".to_string()))
        }
        .instrument(span)
        .await
    }

    fn set_access_token(&self, token: Option<String>) {
        self.client.set_token(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieType;

    #[test]
    fn search_query_omits_absent_filters() {
        let query = HttpMovieApi::search_query(&SearchCriteria::new(" heat ").with_year(" "));
        assert_eq!(query, vec![("query", "heat".to_string()), ("page", "1".to_string())]);
    }

    #[test]
    fn search_query_carries_all_filters() {
        let criteria = SearchCriteria::new("heat")
            .with_year("1995")
            .with_kind(MovieType::Movie)
            .with_page(3);
        let query = HttpMovieApi::search_query(&criteria);
        assert_eq!(
            query,
            vec![
                ("query", "heat".to_string()),
                ("year", "1995".to_string()),
                ("type", "movie".to_string()),
                ("page", "3".to_string()),
            ]
        );
    }

    #[test]
    fn builds_from_config() {
        let config = Config {
            favorites_toggle_path: Some("movies/favorites/toggle".into()),
            ..Config::default()
        };
        let api = HttpMovieApi::from_config(&config).unwrap();
        assert_eq!(api.routes().search.as_str(), "http://localhost:3000/api/movies/search");
        assert!(api.routes().favorites_toggle.is_some());
    }
}
