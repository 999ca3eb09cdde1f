//! Resolves the engine policy a skillmatch invocation runs with.
//!
//! This crate provides utilities for:
//! - Locating the home directory and the `config.toml` file.
//! - Reading `SKILLMATCH_*` environment overrides.
//! - Merging built-in defaults, the `defaults` table, a workspace table,
//!   environment, and command-line overrides into one validated `EngineConfig`.

pub mod config;
pub mod env;

pub use config::{resolve, ConfigError, ConfigFile, ConfigOverrides, ResolvedConfig};
pub use env::{
    config_path, env_exact_pair_limit, env_min_peer_group, env_min_viable_score, env_workspace,
    home_dir,
};
