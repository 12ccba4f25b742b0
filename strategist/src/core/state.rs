//! Pipeline state machine.

use super::StageName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of a pipeline run.
///
/// `Research -> Critique -> Architecture -> Pitch -> Done`, with `Error`
/// reachable from any running stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Running the research stage.
    Research,
    /// Running the critique stage.
    Critique,
    /// Running the architecture stage.
    Architecture,
    /// Running the pitch stage.
    Pitch,
    /// All four stages produced a result.
    Done,
    /// A stage failed unrecoverably.
    Error,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Research
    }
}

impl From<StageName> for PipelineState {
    fn from(stage: StageName) -> Self {
        match stage {
            StageName::Research => Self::Research,
            StageName::Critique => Self::Critique,
            StageName::Architecture => Self::Architecture,
            StageName::Pitch => Self::Pitch,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Critique => write!(f, "critique"),
            Self::Architecture => write!(f, "architecture"),
            Self::Pitch => write!(f, "pitch"),
            Self::Done => write!(f, "done"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl PipelineState {
    /// Returns the stage being executed in this state.
    #[must_use]
    pub const fn stage(&self) -> Option<StageName> {
        match self {
            Self::Research => Some(StageName::Research),
            Self::Critique => Some(StageName::Critique),
            Self::Architecture => Some(StageName::Architecture),
            Self::Pitch => Some(StageName::Pitch),
            Self::Done | Self::Error => None,
        }
    }

    /// Transition taken when the current stage completes.
    #[must_use]
    pub fn advance(self) -> Self {
        match self.stage() {
            Some(stage) => stage.next().map_or(Self::Done, Self::from),
            None => self,
        }
    }

    /// Transition taken when the current stage fails unrecoverably.
    #[must_use]
    pub fn fail(self) -> Self {
        if self.is_terminal() {
            self
        } else {
            Self::Error
        }
    }

    /// Returns true if the state is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}
