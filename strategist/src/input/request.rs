//! The normalized pipeline request.

use super::normalizer::{normalize, ValidationWarning};
use crate::core::TeamStrength;
use serde::{Deserialize, Serialize};

/// One external invocation of the pipeline, after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    /// Hackathon theme.
    pub theme: String,
    /// The raw idea to evaluate.
    pub idea: String,
    /// The team's core strength.
    pub team_strength: TeamStrength,
    /// Event length in hours, within `[1, 168]`.
    pub duration_hours: u32,
}

impl PipelineRequest {
    /// Creates a request from already-normalized values.
    #[must_use]
    pub fn new(
        theme: impl Into<String>,
        idea: impl Into<String>,
        team_strength: TeamStrength,
        duration_hours: u32,
    ) -> Self {
        Self {
            theme: theme.into(),
            idea: idea.into(),
            team_strength,
            duration_hours,
        }
    }

    /// Builds a request from caller-supplied values, returning the
    /// substitutions the normalizer made.
    #[must_use]
    pub fn from_raw(
        theme: &str,
        idea: &str,
        team_strength_raw: &str,
        duration_raw: i64,
    ) -> (Self, Vec<ValidationWarning>) {
        let normalized = normalize(team_strength_raw, duration_raw);
        let request = Self::new(
            theme.trim(),
            idea.trim(),
            normalized.team_strength,
            normalized.duration_hours,
        );
        (request, normalized.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_normalizes() {
        let (request, warnings) =
            PipelineRequest::from_raw(" AI in Education ", "Language learning app", "ai/ml", 9);

        assert_eq!(request.theme, "AI in Education");
        assert_eq!(request.team_strength, TeamStrength::AiMl);
        assert_eq!(request.duration_hours, 9);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_from_raw_reports_substitutions() {
        let (request, warnings) = PipelineRequest::from_raw("t", "i", "Designers", 500);
        assert_eq!(request.team_strength, TeamStrength::FullStack);
        assert_eq!(request.duration_hours, 24);
        assert_eq!(warnings.len(), 2);
    }
}
