//! Error taxonomy for engine operations.
//!
//! Infeasibility (no qualified developer, exhausted capacity, a peer group
//! too small to rank against) is never an error: those outcomes are carried
//! in the returned reports as warnings and unassigned entries.

use thiserror::Error;

/// Errors surfaced to engine callers.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Malformed task signals, fingerprints, or request shapes.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// The violated constraint.
        reason: String,
    },

    /// `max_per_developer` must be a positive integer.
    #[error("max_per_developer must be positive, got {0}")]
    InvalidCapacity(i64),

    /// A developer id that is not part of the roster.
    #[error("unknown developer '{0}'")]
    UnknownDeveloper(String),

    /// A task id that is not part of the request.
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    /// A proposal assigns the same task more than once.
    #[error("task '{0}' is assigned more than once")]
    DuplicateAssignment(String),

    /// A policy that violates its own constraints.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// A collaborator (directory, classifier) failed or timed out.
    #[error("dependency '{dependency}' unavailable: {message}")]
    DependencyUnavailable {
        /// Which collaborator failed.
        dependency: String,
        /// The underlying failure.
        message: String,
    },
}

impl EngineError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn dependency_unavailable(
        dependency: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::DependencyUnavailable {
            dependency: dependency.into(),
            message: message.to_string(),
        }
    }

    /// True for errors caused by the caller's request rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            Self::DependencyUnavailable { .. } | Self::InvalidConfig(_)
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
