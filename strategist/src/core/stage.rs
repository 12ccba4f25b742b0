//! Stage names and their fixed ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four ordered text-generation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Market research on the theme and idea.
    Research,
    /// Critical analysis of the research report.
    Critique,
    /// MVP architecture tailored to the team.
    Architecture,
    /// Demo pitch outline.
    Pitch,
}

impl StageName {
    /// All stages in execution order.
    pub const ALL: [Self; 4] = [Self::Research, Self::Critique, Self::Architecture, Self::Pitch];

    /// Returns the stable lowercase name of the stage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Critique => "critique",
            Self::Architecture => "architecture",
            Self::Pitch => "pitch",
        }
    }

    /// Zero-based position of the stage in the pipeline.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Research => 0,
            Self::Critique => 1,
            Self::Architecture => 2,
            Self::Pitch => 3,
        }
    }

    /// The stage that runs after this one, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Research => Some(Self::Critique),
            Self::Critique => Some(Self::Architecture),
            Self::Architecture => Some(Self::Pitch),
            Self::Pitch => None,
        }
    }

    /// Returns true for the final stage, whose failures are recovered by
    /// fallback synthesis instead of aborting the run.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Pitch)
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
