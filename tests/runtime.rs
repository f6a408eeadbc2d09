//! End-to-end coordinator behaviour through the runtime, against an in-process
//! backend whose replies are released in a test-controlled order.

use async_trait::async_trait;
use movie_mania::api::{FavoriteState, MovieApi, MoviePage};
use movie_mania::app::{Phase, SEARCH_ERROR_MESSAGE};
use movie_mania::domain::{AuthUser, Credentials, Movie, MovieType, PaginationInfo};
use movie_mania::storage::{JsonStorage, Storage};
use movie_mania::{Config, Event, MovieManiaError, Result, Runtime, SearchCriteria};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

type Reply = Result<MoviePage>;

/// Backend double. Searches answer at once unless a gate was registered for
/// their `query:page` key, in which case they wait for the test to release it.
#[derive(Default)]
struct StubApi {
    gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    calls: Mutex<Vec<String>>,
    token: Mutex<Option<String>>,
}

impl StubApi {
    fn gate(&self, key: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(key.to_string(), rx);
        tx
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }
}

#[async_trait]
impl MovieApi for StubApi {
    async fn search(&self, criteria: &SearchCriteria) -> Result<MoviePage> {
        let page = criteria.page_or_default();
        let key = format!("{}:{page}", criteria.query.trim());
        self.calls.lock().push(format!("search {key}"));

        let gate = self.gates.lock().remove(&key);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(MovieManiaError::Worker("gate dropped".into()))),
            None => Ok(listing(&[&format!("{}-{page}", criteria.query.trim())], page, 3)),
        }
    }

    async fn favorites(&self, page: u32) -> Result<MoviePage> {
        self.calls.lock().push(format!("favorites {page}"));
        Ok(listing(&[&format!("fav-{page}")], page, 2))
    }

    async fn add_favorite(&self, movie_id: &str) -> Result<FavoriteState> {
        self.calls.lock().push(format!("add {movie_id}"));
        Ok(FavoriteState {
            movie_id: movie_id.to_string(),
            is_favorite: true,
        })
    }

    async fn remove_favorite(&self, movie_id: &str) -> Result<FavoriteState> {
        self.calls.lock().push(format!("remove {movie_id}"));
        Ok(FavoriteState {
            movie_id: movie_id.to_string(),
            is_favorite: false,
        })
    }

    async fn google_login(&self, google_token: &str) -> Result<Credentials> {
        if google_token != "google-id-token" {
            return Err(MovieManiaError::Api {
                status_code: 401,
                message: "invalid token".into(),
            });
        }
        Ok(Credentials {
            user: AuthUser {
                id: "u1".into(),
                username: "ada".into(),
                email: "ada@example.com".into(),
                profile_pic: String::new(),
            },
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
        })
    }

    fn set_access_token(&self, token: Option<String>) {
        *self.token.lock() = token;
    }
}

#[derive(Default)]
struct MemoryStorage(BTreeMap<String, String>);

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.0.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.0.remove(key);
        Ok(())
    }
}

fn listing(ids: &[&str], page: u32, total_pages: u32) -> MoviePage {
    MoviePage {
        movies: ids
            .iter()
            .map(|id| Movie {
                title: id.to_uppercase(),
                year: "1999".into(),
                id: (*id).to_string(),
                kind: MovieType::Movie,
                poster_url: "N/A".into(),
                is_favorite: false,
            })
            .collect(),
        pagination: PaginationInfo {
            page,
            per_page: 10,
            total_results: total_pages * 10,
            total_pages,
        },
    }
}

fn runtime_with(api: &Arc<StubApi>) -> Runtime {
    Runtime::new(&Config::default(), api.clone(), Box::new(MemoryStorage::default()))
}

/// Dispatches the next queued event (debouncer fire or worker completion).
async fn next(runtime: &mut Runtime) {
    let running = tokio::time::timeout(Duration::from_secs(5), runtime.pump())
        .await
        .expect("no event arrived")
        .unwrap();
    assert!(running);
}

fn ids(runtime: &Runtime) -> Vec<String> {
    runtime.state().movies.iter().map(|m| m.id.clone()).collect()
}

#[tokio::test]
async fn older_response_never_overwrites_newer_one() {
    let api = Arc::new(StubApi::default());
    let alpha = api.gate("alpha:1");
    let beta = api.gate("beta:1");
    let mut runtime = runtime_with(&api);

    runtime.dispatch(&Event::Search(SearchCriteria::new("alpha"))).unwrap();
    runtime.dispatch(&Event::Search(SearchCriteria::new("beta"))).unwrap();

    beta.send(Ok(listing(&["beta-hit"], 1, 1))).unwrap();
    next(&mut runtime).await;
    assert_eq!(ids(&runtime), ["beta-hit"]);

    alpha.send(Ok(listing(&["alpha-hit"], 1, 1))).unwrap();
    next(&mut runtime).await;
    assert_eq!(ids(&runtime), ["beta-hit"]);
    assert_eq!(runtime.state().phase(), Phase::ResultsReady);
}

#[tokio::test]
async fn stale_response_arriving_first_keeps_loading() {
    let api = Arc::new(StubApi::default());
    let alpha = api.gate("alpha:1");
    let beta = api.gate("beta:1");
    let mut runtime = runtime_with(&api);

    runtime.dispatch(&Event::Search(SearchCriteria::new("alpha"))).unwrap();
    runtime.dispatch(&Event::Search(SearchCriteria::new("beta"))).unwrap();

    alpha.send(Ok(listing(&["alpha-hit"], 1, 1))).unwrap();
    next(&mut runtime).await;
    assert!(runtime.state().is_loading);
    assert!(runtime.state().movies.is_empty());

    beta.send(Ok(listing(&["beta-hit"], 1, 1))).unwrap();
    next(&mut runtime).await;
    assert!(!runtime.state().is_loading);
    assert_eq!(ids(&runtime), ["beta-hit"]);
}

#[tokio::test]
async fn clearing_the_query_discards_in_flight_results() {
    let api = Arc::new(StubApi::default());
    let alpha = api.gate("alpha:1");
    let mut runtime = runtime_with(&api);

    runtime.dispatch(&Event::Search(SearchCriteria::new("alpha"))).unwrap();
    runtime.dispatch(&Event::QueryChanged("   ".into())).unwrap();
    assert_eq!(runtime.state().phase(), Phase::Idle);

    alpha.send(Ok(listing(&["alpha-hit"], 1, 1))).unwrap();
    next(&mut runtime).await;

    let state = runtime.state();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.movies.is_empty());
    assert!(!state.is_loading);
    assert!(!state.has_searched);
}

#[tokio::test]
async fn failed_search_shows_fixed_message() {
    let api = Arc::new(StubApi::default());
    let boom = api.gate("boom:1");
    let mut runtime = runtime_with(&api);

    runtime.dispatch(&Event::Search(SearchCriteria::new("boom"))).unwrap();
    boom.send(Err(MovieManiaError::Api {
        status_code: 500,
        message: "backend down".into(),
    }))
    .unwrap();
    next(&mut runtime).await;

    let state = runtime.state();
    assert_eq!(state.phase(), Phase::Errored);
    assert_eq!(state.error.as_deref(), Some(SEARCH_ERROR_MESSAGE));
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn typing_collapses_into_one_search() {
    let api = Arc::new(StubApi::default());
    let mut runtime = runtime_with(&api);

    for text in ["b", "ba", "bat"] {
        runtime.dispatch(&Event::QueryChanged(text.into())).unwrap();
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    assert!(runtime.is_search_pending());
    assert!(api.calls().is_empty());

    next(&mut runtime).await;
    assert!(runtime.state().is_loading);

    next(&mut runtime).await;
    assert_eq!(api.calls(), ["search bat:1"]);
    assert_eq!(ids(&runtime), ["bat-1"]);
}

#[tokio::test(start_paused = true)]
async fn submit_cancels_the_pending_debounced_search() {
    let api = Arc::new(StubApi::default());
    let mut runtime = runtime_with(&api);

    runtime.dispatch(&Event::QueryChanged("heat".into())).unwrap();
    runtime.dispatch(&Event::Submit).unwrap();
    assert!(!runtime.is_search_pending());

    next(&mut runtime).await;
    let quiet = tokio::time::timeout(Duration::from_secs(2), runtime.pump()).await;
    assert!(quiet.is_err());
    assert_eq!(api.calls(), ["search heat:1"]);
}

#[tokio::test(start_paused = true)]
async fn debounce_firing_behind_a_queued_clear_is_dropped() {
    let api = Arc::new(StubApi::default());
    let mut runtime = runtime_with(&api);
    let handle = runtime.handle();

    runtime.dispatch(&Event::QueryChanged("bat".into())).unwrap();
    handle.send(Event::QueryChanged(String::new())).unwrap();
    // The timer elapses while the clear is still waiting in the queue.
    tokio::time::sleep(Duration::from_millis(450)).await;
    assert!(!runtime.is_search_pending());

    next(&mut runtime).await;
    assert_eq!(runtime.state().phase(), Phase::Idle);

    next(&mut runtime).await;
    let state = runtime.state();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.last_criteria.is_none());
    assert!(!state.has_searched);

    let quiet = tokio::time::timeout(Duration::from_secs(2), runtime.pump()).await;
    assert!(quiet.is_err());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn page_change_after_clearing_the_query_does_nothing() {
    let api = Arc::new(StubApi::default());
    let mut runtime = runtime_with(&api);

    runtime.dispatch(&Event::Search(SearchCriteria::new("alpha"))).unwrap();
    next(&mut runtime).await;
    assert_eq!(runtime.state().phase(), Phase::ResultsReady);

    runtime.dispatch(&Event::QueryChanged(String::new())).unwrap();
    runtime.dispatch(&Event::ChangePage(2)).unwrap();

    let state = runtime.state();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(!state.is_loading);
    assert!(state.pagination.is_none());
    assert_eq!(api.calls(), ["search alpha:1"]);
}

#[tokio::test]
async fn page_changes_follow_the_active_listing() {
    let api = Arc::new(StubApi::default());
    let mut runtime = runtime_with(&api);

    runtime
        .dispatch(&Event::Search(SearchCriteria::new("alpha").with_year("1999")))
        .unwrap();
    next(&mut runtime).await;
    runtime.dispatch(&Event::ChangePage(2)).unwrap();
    next(&mut runtime).await;
    assert_eq!(ids(&runtime), ["alpha-2"]);
    assert_eq!(runtime.state().pagination.map(|p| p.page), Some(2));

    runtime.dispatch(&Event::ChangePage(9)).unwrap();
    assert!(!runtime.state().is_loading);

    runtime.dispatch(&Event::ShowFavorites { page: 1 }).unwrap();
    next(&mut runtime).await;
    runtime.dispatch(&Event::ChangePage(2)).unwrap();
    next(&mut runtime).await;

    assert_eq!(
        api.calls(),
        ["search alpha:1", "search alpha:2", "favorites 1", "favorites 2"]
    );
    assert_eq!(runtime.state().phase(), Phase::ViewingFavorites);
    assert!(runtime.state().movies.iter().all(|m| m.is_favorite));
}

#[tokio::test]
async fn toggling_updates_only_the_target_movie() {
    let api = Arc::new(StubApi::default());
    let pair = api.gate("pair:1");
    let mut runtime = runtime_with(&api);

    runtime.dispatch(&Event::Search(SearchCriteria::new("pair"))).unwrap();
    pair.send(Ok(listing(&["x", "y"], 1, 1))).unwrap();
    next(&mut runtime).await;

    runtime
        .dispatch(&Event::ToggleFavorite { movie_id: "x".into() })
        .unwrap();
    next(&mut runtime).await;
    let flags: Vec<bool> = runtime.state().movies.iter().map(|m| m.is_favorite).collect();
    assert_eq!(flags, [true, false]);

    runtime
        .dispatch(&Event::ToggleFavorite { movie_id: "x".into() })
        .unwrap();
    next(&mut runtime).await;
    assert!(!runtime.state().movies[0].is_favorite);

    runtime
        .dispatch(&Event::ToggleFavorite { movie_id: "ghost".into() })
        .unwrap();
    assert_eq!(api.calls(), ["search pair:1", "add x", "remove x"]);
}

#[tokio::test]
async fn session_survives_restart_and_logout_clears_it() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();

    {
        let api = Arc::new(StubApi::default());
        let storage = JsonStorage::in_dir(dir.path()).unwrap();
        let mut runtime = Runtime::new(&config, api.clone(), Box::new(storage));

        runtime
            .dispatch(&Event::Login {
                google_token: "google-id-token".into(),
            })
            .unwrap();
        next(&mut runtime).await;

        assert!(runtime.state().auth.is_authenticated());
        assert_eq!(api.token().as_deref(), Some("access-1"));
    }

    let api = Arc::new(StubApi::default());
    let storage = JsonStorage::in_dir(dir.path()).unwrap();
    let mut runtime = Runtime::new(&config, api.clone(), Box::new(storage));

    let user = runtime.state().auth.user.clone().unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(api.token().as_deref(), Some("access-1"));

    runtime.dispatch(&Event::Logout).unwrap();
    assert_eq!(api.token(), None);
    assert!(!runtime.state().auth.is_authenticated());
    assert_eq!(runtime.storage().get_item(&config.auth_storage_key).unwrap(), None);
}

#[tokio::test]
async fn rejected_login_leaves_session_unchanged() {
    let api = Arc::new(StubApi::default());
    let mut runtime = runtime_with(&api);

    runtime
        .dispatch(&Event::Login {
            google_token: "forged".into(),
        })
        .unwrap();
    next(&mut runtime).await;

    assert!(!runtime.state().auth.is_authenticated());
    assert_eq!(api.token(), None);
    assert_eq!(
        runtime.storage().get_item(&Config::default().auth_storage_key).unwrap(),
        None
    );
}

#[tokio::test]
async fn run_publishes_snapshots_until_shutdown() {
    let api = Arc::new(StubApi::default());
    let runtime = runtime_with(&api);
    let handle = runtime.handle();
    let mut snapshots = handle.subscribe();
    let task = tokio::spawn(runtime.run());

    handle.send(Event::Search(SearchCriteria::new("heat"))).unwrap();
    let settled = tokio::time::timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|state| state.has_searched && !state.is_loading),
    )
    .await
    .expect("results were never published")
    .unwrap()
    .clone();
    assert_eq!(settled.movies[0].id, "heat-1");

    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();
    assert!(handle.send(Event::Submit).is_err());
}
