use crate::config::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

/// Returns the user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    dirs::home_dir()
}

/// Returns the config file path: `SKILLMATCH_CONFIG`, else `~/.skillmatch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(custom) = env_config_path() {
        return Some(custom);
    }
    home_dir().map(|h| h.join(".skillmatch").join("config.toml"))
}

/// Returns the explicit config path from `SKILLMATCH_CONFIG`, if set.
pub fn env_config_path() -> Option<PathBuf> {
    std::env::var("SKILLMATCH_CONFIG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Returns the workspace selected by `SKILLMATCH_WORKSPACE`.
pub fn env_workspace() -> Option<String> {
    std::env::var("SKILLMATCH_WORKSPACE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns `SKILLMATCH_MIN_VIABLE_SCORE`; an unparseable value is an error.
pub fn env_min_viable_score() -> Result<Option<f64>, ConfigError> {
    parse_env("SKILLMATCH_MIN_VIABLE_SCORE")
}

/// Returns `SKILLMATCH_MIN_PEER_GROUP`; an unparseable value is an error.
pub fn env_min_peer_group() -> Result<Option<usize>, ConfigError> {
    parse_env("SKILLMATCH_MIN_PEER_GROUP")
}

/// Returns `SKILLMATCH_EXACT_PAIR_LIMIT`; an unparseable value is an error.
pub fn env_exact_pair_limit() -> Result<Option<usize>, ConfigError> {
    parse_env("SKILLMATCH_EXACT_PAIR_LIMIT")
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: raw,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use skillmatch_test_utils::{env_guard, set_env_var};

    #[test]
    #[serial]
    fn config_path_prefers_env_override() {
        let _g = env_guard();
        let _cfg = set_env_var("SKILLMATCH_CONFIG", Some("/tmp/custom.toml"));
        assert_eq!(config_path(), Some(PathBuf::from("/tmp/custom.toml")));
    }

    #[test]
    #[serial]
    fn config_path_defaults_under_home() {
        let _g = env_guard();
        let _cfg = set_env_var("SKILLMATCH_CONFIG", None);
        let _home = set_env_var("HOME", Some("/home/dev"));
        let path = config_path().unwrap();
        assert!(path.ends_with(".skillmatch/config.toml"));
        assert!(path.starts_with("/home/dev"));
    }

    #[test]
    #[serial]
    fn blank_workspace_is_ignored() {
        let _g = env_guard();
        let _ws = set_env_var("SKILLMATCH_WORKSPACE", Some("   "));
        assert_eq!(env_workspace(), None);
    }

    #[test]
    #[serial]
    fn numeric_overrides_parse() {
        let _g = env_guard();
        let _score = set_env_var("SKILLMATCH_MIN_VIABLE_SCORE", Some(" 42.5 "));
        let _peers = set_env_var("SKILLMATCH_MIN_PEER_GROUP", Some("5"));
        let _limit = set_env_var("SKILLMATCH_EXACT_PAIR_LIMIT", None);
        assert_eq!(env_min_viable_score().unwrap(), Some(42.5));
        assert_eq!(env_min_peer_group().unwrap(), Some(5));
        assert_eq!(env_exact_pair_limit().unwrap(), None);
    }

    #[test]
    #[serial]
    fn unparseable_override_is_reported() {
        let _g = env_guard();
        let _peers = set_env_var("SKILLMATCH_MIN_PEER_GROUP", Some("three"));
        match env_min_peer_group() {
            Err(ConfigError::InvalidEnv { key, value }) => {
                assert_eq!(key, "SKILLMATCH_MIN_PEER_GROUP");
                assert_eq!(value, "three");
            }
            other => panic!("expected InvalidEnv, got {other:?}"),
        }
    }
}
