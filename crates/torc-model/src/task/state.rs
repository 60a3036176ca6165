use serde::{Deserialize, Serialize};

/// Lifecycle state of a task in the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TesState {
    #[default]
    Unknown,
    Queued,
    Initializing,
    Running,
    Paused,
    Complete,
    ExecutorError,
    SystemError,
    Canceled,
    Canceling,
    Preempted,
}

impl TesState {
    /// No further transitions are expected from a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TesState::Complete
                | TesState::ExecutorError
                | TesState::SystemError
                | TesState::Canceled
                | TesState::Preempted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::TesState;

    #[test]
    fn serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&TesState::SystemError).unwrap(), r#""SYSTEM_ERROR""#);
        assert!(TesState::SystemError.is_terminal());
        assert!(!TesState::Running.is_terminal());
    }
}
