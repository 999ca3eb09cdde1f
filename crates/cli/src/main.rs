//! Command-line interface for the `skillmatch` application.
//!
//! This crate serves as the main entry point for the executable, delegating
//! its core functionality to the `skillmatch-server` crate.

fn main() -> anyhow::Result<()> {
    skillmatch_server::run()
}
