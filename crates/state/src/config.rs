//! Configuration file support for skillmatch.
//!
//! Engine policy is resolved with the following precedence:
//! CLI flags > environment variables > workspace table > `defaults` table > built-in defaults
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.skillmatch/config.toml
//!
//! [defaults.weights]
//! skill = 0.5
//! experience = 0.3
//! growth = 0.2
//!
//! # Per-workspace policy, deep-merged over `defaults`
//! [workspaces.acme.weights]
//! growth = 0.4
//!
//! [workspaces.acme.assignment]
//! min_viable_score = 20.0
//! ```

use crate::env;
use serde::{Deserialize, Serialize};
use skillmatch_intelligence::{EngineConfig, EngineError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown workspace '{0}'")]
    UnknownWorkspace(String),

    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },

    #[error(transparent)]
    Invalid(#[from] EngineError),
}

/// Raw contents of `config.toml`.
///
/// Tables stay untyped until merged so a workspace can override a single
/// field of a policy without restating the rest.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: toml::Table,
    #[serde(default)]
    pub workspaces: BTreeMap<String, toml::Table>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn workspace_names(&self) -> Vec<&str> {
        self.workspaces.keys().map(String::as_str).collect()
    }

    /// The `defaults` table with the workspace table deep-merged over it.
    fn merged(&self, workspace: Option<&str>) -> Result<toml::Table, ConfigError> {
        let mut merged = self.defaults.clone();
        if let Some(name) = workspace {
            let table = self
                .workspaces
                .get(name)
                .ok_or_else(|| ConfigError::UnknownWorkspace(name.to_string()))?;
            deep_merge(&mut merged, table);
        }
        Ok(merged)
    }
}

/// Overrides supplied on the command line. `None` leaves lower layers in place.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub workspace: Option<String>,
    pub min_viable_score: Option<f64>,
    pub min_peer_group_size: Option<usize>,
    pub exact_pair_limit: Option<usize>,
}

/// The validated policy for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub workspace: Option<String>,
    /// The config file that contributed, if any.
    pub source: Option<PathBuf>,
    pub engine: EngineConfig,
}

/// Resolves configuration from every layer and validates the result.
///
/// An explicitly named config file (flag or `SKILLMATCH_CONFIG`) must exist;
/// the default `~/.skillmatch/config.toml` is optional.
pub fn resolve(overrides: &ConfigOverrides) -> Result<ResolvedConfig, ConfigError> {
    let explicit = overrides.config_path.clone().or_else(env::env_config_path);
    let (file, source) = match explicit {
        Some(path) => (ConfigFile::load(&path)?, Some(path)),
        None => match env::config_path() {
            Some(path) if path.exists() => (ConfigFile::load(&path)?, Some(path)),
            _ => (ConfigFile::default(), None),
        },
    };

    let workspace = overrides.workspace.clone().or_else(env::env_workspace);
    let merged = file.merged(workspace.as_deref())?;
    let mut engine: EngineConfig =
        toml::Value::Table(merged)
            .try_into()
            .map_err(|err| ConfigError::Parse {
                path: source_path(source.as_ref()),
                source: err,
            })?;

    if let Some(score) = env::env_min_viable_score()? {
        engine.assignment.min_viable_score = score;
    }
    if let Some(size) = env::env_min_peer_group()? {
        engine.benchmark.min_peer_group_size = size;
    }
    if let Some(limit) = env::env_exact_pair_limit()? {
        engine.assignment.exact_pair_limit = limit;
    }

    if let Some(score) = overrides.min_viable_score {
        engine.assignment.min_viable_score = score;
    }
    if let Some(size) = overrides.min_peer_group_size {
        engine.benchmark.min_peer_group_size = size;
    }
    if let Some(limit) = overrides.exact_pair_limit {
        engine.assignment.exact_pair_limit = limit;
    }

    engine.validate()?;

    tracing::debug!(
        target: "skillmatch::config",
        workspace = workspace.as_deref().unwrap_or("<none>"),
        source = source.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
        "Resolved engine configuration"
    );

    Ok(ResolvedConfig {
        workspace,
        source,
        engine,
    })
}

fn source_path(path: Option<&PathBuf>) -> PathBuf {
    path.cloned().unwrap_or_else(|| PathBuf::from("<defaults>"))
}

/// Merges `overlay` into `base`; nested tables merge, everything else replaces.
fn deep_merge(base: &mut toml::Table, overlay: &toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> toml::Table {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn deep_merge_keeps_sibling_fields() {
        let mut base = table("[weights]\nskill = 0.6\nexperience = 0.2\n");
        deep_merge(&mut base, &table("[weights]\nexperience = 0.4\n"));
        let weights = base["weights"].as_table().unwrap();
        assert_eq!(weights["skill"].as_float(), Some(0.6));
        assert_eq!(weights["experience"].as_float(), Some(0.4));
    }

    #[test]
    fn deep_merge_replaces_scalars_with_tables() {
        let mut base = table("assignment = 3\n");
        deep_merge(&mut base, &table("[assignment]\nmin_viable_score = 10.0\n"));
        assert!(base["assignment"].is_table());
    }

    #[test]
    fn workspace_table_overrides_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            [defaults.weights]
            growth = 0.1
            [workspaces.acme.weights]
            growth = 0.4
            "#,
        )
        .unwrap();
        let merged = file.merged(Some("acme")).unwrap();
        let config: EngineConfig = toml::Value::Table(merged).try_into().unwrap();
        assert_eq!(config.weights.growth, 0.4);
        assert_eq!(config.weights.skill, 0.5);
    }

    #[test]
    fn missing_workspace_is_unknown() {
        let file = ConfigFile::default();
        assert!(matches!(
            file.merged(Some("nope")),
            Err(ConfigError::UnknownWorkspace(name)) if name == "nope"
        ));
    }

    #[test]
    fn parse_empty_file() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert!(file.defaults.is_empty());
        assert!(file.workspace_names().is_empty());
    }
}
