//! Team strength categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of team strengths a strategy can be tailored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamStrength {
    /// UI/UX focused team.
    #[serde(rename = "Frontend")]
    Frontend,
    /// API and data focused team.
    #[serde(rename = "Backend")]
    Backend,
    /// Machine learning focused team.
    #[serde(rename = "AI/ML")]
    AiMl,
    /// Balanced end-to-end team.
    #[serde(rename = "Full-Stack")]
    FullStack,
}

impl Default for TeamStrength {
    fn default() -> Self {
        Self::FullStack
    }
}

impl TeamStrength {
    /// All team strengths.
    pub const ALL: [Self; 4] = [Self::Frontend, Self::Backend, Self::AiMl, Self::FullStack];

    /// Canonical display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Frontend => "Frontend",
            Self::Backend => "Backend",
            Self::AiMl => "AI/ML",
            Self::FullStack => "Full-Stack",
        }
    }

    /// Lowercase tokens that count as a mention of this strength in
    /// generated text.
    #[must_use]
    pub const fn mention_tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Frontend => &["frontend", "front-end", "front end"],
            Self::Backend => &["backend", "back-end", "back end"],
            Self::AiMl => &["ai/ml", "ai-ml", "machine learning"],
            Self::FullStack => &["full-stack", "full stack", "fullstack"],
        }
    }
}

impl fmt::Display for TeamStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
