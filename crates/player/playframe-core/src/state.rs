use serde::{Deserialize, Serialize};

/// Lifecycle state of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Gating control shown, playable not loaded yet
    #[default]
    AwaitingStart,
    /// Frame loop is driving the playable
    Running,
    /// Frame loop was stopped explicitly, or by a playable error
    Stopped,
}

impl LifecycleState {
    /// Get the name of this lifecycle state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingStart => "awaiting_start",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }

    /// Check if the frame loop is active
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Check if the frame loop may be (re)started from this state.
    /// A player that never went through the gating action cannot start.
    #[inline]
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Check if the frame loop can be stopped
    #[inline]
    pub fn can_stop(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl From<&str> for LifecycleState {
    fn from(s: &str) -> Self {
        match s {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            _ => Self::AwaitingStart,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
