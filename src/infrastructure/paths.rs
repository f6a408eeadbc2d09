//! Data directory resolution.
//!
//! Local client storage, the optional `config.toml`, and the span export file all
//! live in one per-user directory, `$XDG_DATA_HOME/movie-mania`, falling back to
//! `~/.local/share/movie-mania`.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "movie-mania";

/// Returns the data directory, honouring an explicit override first.
///
/// # Examples
///
/// ```
/// use movie_mania::infrastructure::get_data_dir;
///
/// let dir = get_data_dir(Some("/tmp/movie-mania-test"));
/// assert_eq!(dir.to_str(), Some("/tmp/movie-mania-test"));
/// ```
#[must_use]
pub fn get_data_dir(override_dir: Option<&str>) -> PathBuf {
    resolve_data_dir(
        override_dir,
        env::var("XDG_DATA_HOME").ok().as_deref(),
        env::var("HOME").ok().as_deref(),
    )
}

fn resolve_data_dir(override_dir: Option<&str>, xdg_data_home: Option<&str>, home: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(expand_tilde(dir, home));
    }

    match (xdg_data_home.filter(|d| !d.is_empty()), home.filter(|h| !h.is_empty())) {
        (Some(xdg), _) => PathBuf::from(xdg).join(APP_DIR),
        (None, Some(home)) => PathBuf::from(home).join(".local").join("share").join(APP_DIR),
        (None, None) => PathBuf::from(".").join(APP_DIR),
    }
}

/// Expands a leading `~` to `home`; other paths are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&str>) -> String {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => format!("{home}{rest}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_and_expands_tilde() {
        let dir = resolve_data_dir(Some("~/mm"), Some("/xdg"), Some("/home/ada"));
        assert_eq!(dir, PathBuf::from("/home/ada/mm"));
    }

    #[test]
    fn xdg_then_home_then_cwd() {
        assert_eq!(resolve_data_dir(None, Some("/xdg"), Some("/home/ada")), PathBuf::from("/xdg/movie-mania"));
        assert_eq!(
            resolve_data_dir(None, None, Some("/home/ada")),
            PathBuf::from("/home/ada/.local/share/movie-mania")
        );
        assert_eq!(resolve_data_dir(Some("  "), Some(""), None), PathBuf::from("./movie-mania"));
    }

    #[test]
    fn tilde_only_expands_as_a_path_component() {
        assert_eq!(expand_tilde("~", Some("/h")), "/h");
        assert_eq!(expand_tilde("~user/x", Some("/h")), "~user/x");
        assert_eq!(expand_tilde("/abs", Some("/h")), "/abs");
        assert_eq!(expand_tilde("~/x", None), "~/x");
    }
}
