//! Line-driven front end and entry point.
//!
//! Thin integration layer between stdin and the Movie Mania runtime: each input
//! line is parsed into one or more library events, and every published state
//! snapshot is rendered to stdout.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  stdin reader (main task)           │  ← parses commands
//! │          │ RuntimeHandle::send      │
//! │          ▼                          │
//! │  Runtime::run (spawned task)        │  ← coordinator + effects
//! │          │ watch<AppState>          │
//! │          ▼                          │
//! │  printer (spawned task)             │  ← renders snapshots
//! └─────────────────────────────────────┘
//! ```
//!
//! # Startup
//!
//! 1. Load and validate [`Config`]; a missing OAuth client id with
//!    `require_login` set aborts here
//! 2. Initialize tracing (span file plus stderr)
//! 3. Open local storage in the data directory and rehydrate the session
//! 4. Build the HTTP API client and start the runtime
//!
//! # Commands
//!
//! - `type <text>`: Edit the query (debounced search)
//! - `search <text>`: Set the query and search at once
//! - `year <yyyy|->`, `kind <movie|series|episode|->`: Filters (immediate)
//! - `page <n>`: Go to a page of the current listing
//! - `favorites [n]`: Show favourites
//! - `fav <id>`: Toggle a visible title's favourite flag
//! - `login <google-id-token>`, `logout`
//! - `help`, `quit`

#![allow(clippy::multiple_crate_versions)]

use movie_mania::domain::MovieType;
use movie_mania::observability::{init_tracing, shutdown_tracing};
use movie_mania::storage::JsonStorage;
use movie_mania::{ui, Config, Event, HttpMovieApi, MovieManiaError, Result, Runtime};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  type <text>          edit the query (search starts when you stop typing)
  search <text>        search immediately
  year <yyyy|->        filter by year, '-' clears
  kind <type|->        filter by movie, series or episode, '-' clears
  page <n>             go to page n
  favorites [n]        show your favourites
  fav <id>             toggle a title's favourite flag
  login <token>        sign in with a Google ID token
  logout               sign out
  quit                 exit";

/// What one input line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Events(Vec<Event>),
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let events = match verb {
        "type" => vec![Event::QueryChanged(rest.to_string())],
        "search" => vec![Event::QueryChanged(rest.to_string()), Event::Submit],
        "year" => vec![Event::YearChanged(cleared(rest).map(String::from))],
        "kind" => match cleared(rest) {
            None => vec![Event::TypeChanged(None)],
            Some(raw) => {
                let kind = MovieType::parse(raw).ok_or_else(|| format!("unknown type '{raw}'"))?;
                vec![Event::TypeChanged(Some(kind))]
            }
        },
        "page" => vec![Event::ChangePage(parse_page(rest)?)],
        "favorites" | "favourites" => {
            let page = if rest.is_empty() { 1 } else { parse_page(rest)? };
            vec![Event::ShowFavorites { page }]
        }
        "fav" if !rest.is_empty() => vec![Event::ToggleFavorite {
            movie_id: rest.to_string(),
        }],
        "login" if !rest.is_empty() => vec![Event::Login {
            google_token: rest.to_string(),
        }],
        "logout" => vec![Event::Logout],
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        _ => return Err(format!("unrecognised command '{line}', try 'help'")),
    };
    Ok(Some(Command::Events(events)))
}

/// `-` (or nothing) clears a filter.
fn cleared(raw: &str) -> Option<&str> {
    Some(raw).filter(|r| !r.is_empty() && *r != "-")
}

fn parse_page(raw: &str) -> std::result::Result<u32, String> {
    raw.parse().map_err(|_| format!("'{raw}' is not a page number"))
}

async fn run() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;
    init_tracing(&config, true);

    let span = tracing::debug_span!("startup");
    let (runtime, handle) = {
        let _guard = span.enter();

        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)?;
        let storage = JsonStorage::in_dir(&data_dir)?;
        tracing::debug!(path = %storage.path().display(), "opened local storage");

        let api = Arc::new(HttpMovieApi::from_config(&config)?);
        tracing::debug!(base_url = %config.api_base_url, "api client ready");

        let runtime = Runtime::new(&config, api, Box::new(storage));
        let handle = runtime.handle();
        (runtime, handle)
    };

    let mut snapshots = handle.subscribe();
    println!("{}", ui::render(&snapshots.borrow_and_update()));

    let runtime_task = tokio::spawn(runtime.run());
    let printer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let text = ui::render(&snapshots.borrow_and_update());
            println!("{text}");
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Events(events))) => {
                for event in events {
                    handle.send(event)?;
                }
            }
            Err(message) => eprintln!("{message}"),
        }
    }

    if handle.shutdown().is_err() {
        tracing::debug!("runtime already stopped");
    }
    let outcome = runtime_task
        .await
        .map_err(|e| MovieManiaError::Worker(format!("runtime task failed: {e}")))?;
    printer.abort();
    shutdown_tracing();
    outcome
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("movie-mania: {e}");
            ExitCode::FAILURE
        }
    }
}
