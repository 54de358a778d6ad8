//! Error types for the player

use serde::{Deserialize, Serialize};

use crate::playable::Capability;

/// Error type for player construction and lifecycle operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlayerError {
    /// The supplied object does not expose the playable operations
    #[error("Passed object is not playable: missing {missing}")]
    NotPlayable { missing: String },

    /// A lifecycle request that the current state does not allow
    #[error("Invalid player state: {current_state} -> {requested_state}")]
    InvalidState {
        current_state: String,
        requested_state: String,
    },

    /// Error returned by the hosted playable
    #[error("Playable {operation} failed: {reason}")]
    Playable { operation: String, reason: String },

    /// Failure reported by the hosting platform (DOM, frame scheduler)
    #[error("Platform error: {reason}")]
    Platform { reason: String },

    /// Invalid or unparsable configuration
    #[error("Config error: {reason}")]
    Config { reason: String },
}

impl PlayerError {
    /// Build a `NotPlayable` error listing the missing operations.
    pub fn not_playable(missing: &[Capability]) -> Self {
        let names: Vec<&str> = missing.iter().map(Capability::name).collect();
        Self::NotPlayable {
            missing: names.join(", "),
        }
    }

    pub fn invalid_state(current: impl Into<String>, requested: impl Into<String>) -> Self {
        Self::InvalidState {
            current_state: current.into(),
            requested_state: requested.into(),
        }
    }

    /// Wrap an error that escaped from `load` or `update`.
    pub fn playable(operation: Capability, err: &anyhow::Error) -> Self {
        Self::Playable {
            operation: operation.name().to_string(),
            reason: format!("{err:#}"),
        }
    }

    pub fn platform(reason: impl Into<String>) -> Self {
        Self::Platform {
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Check if the player can keep being used after this error.
    /// A failed `load` is terminal: the playable is never loaded again.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidState { .. } => true,
            Self::Playable { operation, .. } => operation == Capability::Update.name(),
            _ => false,
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotPlayable { .. } => "contract",
            Self::InvalidState { .. } => "lifecycle",
            Self::Playable { .. } => "playable",
            Self::Platform { .. } => "platform",
            Self::Config { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_playable_lists_missing_operations() {
        let err = PlayerError::not_playable(&[Capability::Load, Capability::Update]);
        assert_eq!(
            err.to_string(),
            "Passed object is not playable: missing load, update"
        );
        assert_eq!(err.category(), "contract");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn playable_error_keeps_context_chain() {
        let inner = anyhow::anyhow!("texture missing").context("loading level 1");
        let err = PlayerError::playable(Capability::Load, &inner);
        match &err {
            PlayerError::Playable { operation, reason } => {
                assert_eq!(operation, "load");
                assert_eq!(reason, "loading level 1: texture missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_update_failures_are_recoverable() {
        let cause = anyhow::anyhow!("boom");
        assert!(!PlayerError::playable(Capability::Load, &cause).is_recoverable());
        assert!(PlayerError::playable(Capability::Update, &cause).is_recoverable());
        assert!(PlayerError::invalid_state("running", "running").is_recoverable());
        assert!(!PlayerError::platform("no window").is_recoverable());
    }

    #[test]
    fn json_errors_become_config_errors() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PlayerError = parse.into();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_serialization() {
        let error = PlayerError::invalid_state("running", "running");
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: PlayerError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
