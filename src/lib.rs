//! Movie Mania: a movie search client with favourites and OAuth sessions.
//!
//! Movie Mania provides:
//! - Free-text catalog search, debounced while typing, with year and type filters
//! - Race-safe result handling: only the most recently issued request may update the view
//! - Paging that replays the active search or favourites listing
//! - Favourite toggling reconciled from server responses
//! - OAuth sign-in with a session persisted in local storage

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Line-driven shim (main.rs)                         │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Event
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Effect executor
//! │  - Event channel, debouncer, session persistence    │
//! └─────────────────────────────────────────────────────┘
//!         │ handle_event          │ PostToWorker (spawned task)
//! ┌───────────────┐      ┌───────────────┐      ┌───────────────┐
//! │ Application   │      │ Worker        │      │ API adapter   │
//! │ (app/)        │      │ (worker/)     │ ───▶ │ (api/)        │
//! │ - AppState    │      │ - Messages    │      │ - HTTP client │
//! │ - Events      │      │ - MovieWorker │      │ - Normalizer  │
//! └───────────────┘      └───────────────┘      └───────────────┘
//!         │
//! ┌───────────────┐      ┌─────────────────────────────────────┐
//! │ UI (ui/)      │      │ Infrastructure, Storage, Domain     │
//! │ - View model  │      │ - Debouncer, data dir (infrastructure/)
//! │ - Renderer    │      │ - Local storage (storage/)          │
//! └───────────────┘      └─────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing + OpenTelemetry, JSON-lines span file    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Coordinator state machine with the event/action model
//! - [`api`]: `MovieApi` trait, HTTP implementation, response normalization
//! - [`domain`]: Core types (movies, criteria, pagination, session, errors)
//! - [`infrastructure`]: Debouncer and data directory resolution
//! - [`runtime`]: Executes actions and publishes state snapshots
//! - [`storage`]: Key/value local storage with a JSON file backend
//! - [`worker`]: Background request execution with trace propagation
//! - [`ui`]: View model and plain-text renderer
//! - [`observability`]: Tracing subscriber and span export
//!
//! # Configuration
//!
//! Configuration is layered, lowest precedence first: built-in defaults, a TOML
//! file (`$MOVIE_MANIA_CONFIG` or `config.toml` in the data directory), then
//! `MOVIE_MANIA_*` environment variables.
//!
//! ```toml
//! api_base_url = "https://movies.example.com/api"
//! google_client_id = "1234.apps.googleusercontent.com"
//! require_login = true
//! debounce_ms = 300
//! trace_level = "debug"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use movie_mania::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (_, actions) = handle_event(&mut state, &Event::Submit)?;
//! // A blank query resets to idle instead of hitting the backend.
//! assert!(matches!(actions.as_slice(), [Action::CancelScheduledSearch]));
//! # Ok::<(), movie_mania::MovieManiaError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod storage;
pub mod ui;
pub mod worker;

pub use api::{HttpMovieApi, MovieApi};
pub use app::{handle_event, Action, ActiveMode, AppState, Event, Phase};
pub use domain::{Movie, MovieManiaError, MovieType, Result, SearchCriteria};
pub use runtime::{Runtime, RuntimeHandle};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variables and the configuration keys they set.
const ENV_KEYS: &[(&str, &str)] = &[
    ("MOVIE_MANIA_API_URL", "api_base_url"),
    ("MOVIE_MANIA_GOOGLE_CLIENT_ID", "google_client_id"),
    ("MOVIE_MANIA_AUTH_KEY", "auth_storage_key"),
    ("MOVIE_MANIA_REQUIRE_LOGIN", "require_login"),
    ("MOVIE_MANIA_DEBOUNCE_MS", "debounce_ms"),
    ("MOVIE_MANIA_TRACE_LEVEL", "trace_level"),
    ("MOVIE_MANIA_DATA_DIR", "data_dir"),
];

/// Points at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "MOVIE_MANIA_CONFIG";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every endpoint path is resolved against.
    pub api_base_url: String,

    /// OAuth client id. Required when `require_login` is set.
    pub google_client_id: Option<String>,

    /// Local storage key of the persisted session.
    pub auth_storage_key: String,

    /// Refuse to start without an OAuth client id.
    pub require_login: bool,

    /// Quiet period of the typing debouncer, in milliseconds.
    pub debounce_ms: u64,

    pub request_timeout_secs: u64,

    /// Path of a unified favourite-toggle endpoint, relative to the base URL.
    ///
    /// When unset, toggling uses POST/DELETE on `/movies/favorites`.
    pub favorites_toggle_path: Option<String>,

    /// Overrides the data directory (storage, span file, `config.toml`).
    pub data_dir: Option<String>,

    /// Tracing filter used when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            google_client_id: None,
            auth_storage_key: "movie-mania-auth".to_string(),
            require_login: false,
            debounce_ms: 400,
            request_timeout_secs: 30,
            favorites_toggle_path: None,
            data_dir: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, starting from defaults.
    ///
    /// # Parsing Rules
    ///
    /// - Numbers and booleans fall back to their defaults on parse error
    /// - Booleans accept `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`
    /// - Blank values clear optional settings
    /// - Unknown keys are ignored
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use movie_mania::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    /// map.insert("require_login".to_string(), "yes".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 250);
    /// assert!(config.require_login);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().merged_with(map)
    }

    /// Overlays the values present in `map` onto `self`.
    #[must_use]
    pub fn merged_with(mut self, map: &BTreeMap<String, String>) -> Self {
        let optional = |key: &str| {
            map.get(key)
                .map(|v| Some(v.trim().to_string()).filter(|v| !v.is_empty()))
        };

        if let Some(url) = map.get("api_base_url").map(|v| v.trim()).filter(|v| !v.is_empty()) {
            self.api_base_url = url.to_string();
        }
        if let Some(key) = map.get("auth_storage_key").map(|v| v.trim()).filter(|v| !v.is_empty()) {
            self.auth_storage_key = key.to_string();
        }
        if let Some(require) = map.get("require_login").and_then(|v| parse_bool(v)) {
            self.require_login = require;
        }
        if let Some(ms) = map.get("debounce_ms").and_then(|v| v.trim().parse().ok()) {
            self.debounce_ms = ms;
        }
        if let Some(secs) = map.get("request_timeout_secs").and_then(|v| v.trim().parse().ok()) {
            self.request_timeout_secs = secs;
        }
        if let Some(id) = optional("google_client_id") {
            self.google_client_id = id;
        }
        if let Some(path) = optional("favorites_toggle_path") {
            self.favorites_toggle_path = path;
        }
        if let Some(dir) = optional("data_dir") {
            self.data_dir = dir;
        }
        if let Some(level) = optional("trace_level") {
            self.trace_level = level;
        }
        self
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MovieManiaError::Config`] if the document is malformed.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| MovieManiaError::Config(format!("invalid config file: {e}")))
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be parsed, or
    /// if `$MOVIE_MANIA_CONFIG` names a file that cannot be read.
    pub fn load() -> Result<Self> {
        let env: BTreeMap<String, String> = std::env::vars().collect();
        Self::load_from_env(&env)
    }

    /// Loads configuration using `env` in place of the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from_env(env: &BTreeMap<String, String>) -> Result<Self> {
        let overrides: BTreeMap<String, String> = ENV_KEYS
            .iter()
            .filter_map(|(var, key)| env.get(*var).map(|v| ((*key).to_string(), v.clone())))
            .collect();

        let base = match env.get(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                let path = infrastructure::expand_tilde(path.trim(), env.get("HOME").map(String::as_str));
                Self::from_file(Path::new(&path))?
            }
            None => {
                let data_dir = overrides.get("data_dir").map(String::as_str);
                let path = default_config_path(data_dir);
                if path.is_file() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(base.merged_with(&overrides))
    }

    /// Checks settings that must hold before startup.
    ///
    /// # Errors
    ///
    /// Returns [`MovieManiaError::Config`] when login is required but no OAuth
    /// client id is configured or the request timeout is zero, and
    /// [`MovieManiaError::Url`] when the base URL does not parse.
    pub fn validate(&self) -> Result<()> {
        if self.require_login && self.google_client_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            return Err(MovieManiaError::Config(
                "google_client_id is required when require_login is set".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(MovieManiaError::Config("request_timeout_secs must be positive".to_string()));
        }
        url::Url::parse(&self.api_base_url)?;
        Ok(())
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        infrastructure::get_data_dir(self.data_dir.as_deref())
    }
}

fn default_config_path(data_dir: Option<&str>) -> PathBuf {
    infrastructure::get_data_dir(data_dir).join("config.toml")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
