//! CLI handler for the `config` command.

use super::{emit, render};
use crate::cli::OutputFormat;
use anyhow::Result;
use skillmatch_state::ResolvedConfig;

/// Handle the `config` command.
pub(crate) fn handle_config_command(
    resolved: &ResolvedConfig,
    format: OutputFormat,
) -> Result<String> {
    emit(resolved, format, render::config)
}
