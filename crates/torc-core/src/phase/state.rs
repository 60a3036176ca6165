use std::fmt;

/// Lifecycle of one phase invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Created,
    Submitting,
    Waiting,
    Logging,
    Completed,
    Failed,
}

impl PhaseState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PhaseState::Completed | PhaseState::Failed)
    }

    /// Whether the template may move from `self` to `next`.
    pub fn can_advance(self, next: PhaseState) -> bool {
        use PhaseState::*;
        matches!(
            (self, next),
            (Created, Submitting)
                | (Submitting, Waiting)
                | (Waiting, Logging)
                | (Logging, Completed)
                | (Submitting | Waiting | Logging, Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseState::Created => "created",
            PhaseState::Submitting => "submitting",
            PhaseState::Waiting => "waiting",
            PhaseState::Logging => "logging",
            PhaseState::Completed => "completed",
            PhaseState::Failed => "failed",
        }
    }
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
