//! Input normalization for team strength and duration.
//!
//! Neither input can fail a run. Unknown team strengths resolve to
//! Full-Stack and out-of-range durations resolve to 24 hours, each with a
//! warning the caller can observe.

use crate::core::TeamStrength;
use crate::utils::fold_key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest accepted duration in hours.
pub const MIN_DURATION_HOURS: i64 = 1;

/// Longest accepted duration in hours (one week).
pub const MAX_DURATION_HOURS: i64 = 168;

/// Duration substituted for out-of-range input.
pub const DEFAULT_DURATION_HOURS: u32 = 24;

/// Folded aliases, see [`fold_key`].
const TEAM_ALIASES: &[(&str, TeamStrength)] = &[
    ("frontend", TeamStrength::Frontend),
    ("frontendfocused", TeamStrength::Frontend),
    ("ui", TeamStrength::Frontend),
    ("uiux", TeamStrength::Frontend),
    ("backend", TeamStrength::Backend),
    ("backendfocused", TeamStrength::Backend),
    ("server", TeamStrength::Backend),
    ("aiml", TeamStrength::AiMl),
    ("aimlfocused", TeamStrength::AiMl),
    ("ai", TeamStrength::AiMl),
    ("ml", TeamStrength::AiMl),
    ("machinelearning", TeamStrength::AiMl),
    ("fullstack", TeamStrength::FullStack),
    ("fullstackfocused", TeamStrength::FullStack),
];

/// A non-fatal input problem corrected by default substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// The team strength matched no known alias.
    TeamStrength {
        /// The value supplied by the caller.
        raw: String,
        /// The value used instead.
        substituted: TeamStrength,
    },
    /// The duration fell outside the accepted range.
    Duration {
        /// The value supplied by the caller.
        raw: i64,
        /// The value used instead.
        substituted: u32,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamStrength { raw, substituted } => write!(
                f,
                "unknown team strength {raw:?}, using {substituted}"
            ),
            Self::Duration { raw, substituted } => write!(
                f,
                "duration {raw}h outside [{MIN_DURATION_HOURS}, {MAX_DURATION_HOURS}], using {substituted}h"
            ),
        }
    }
}

/// Result of normalizing the two free-form inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    /// Canonical team strength.
    pub team_strength: TeamStrength,
    /// Duration in hours, within the accepted range.
    pub duration_hours: u32,
    /// Substitutions made along the way.
    pub warnings: Vec<ValidationWarning>,
}

/// Normalizes a team strength label.
///
/// Matching is case and spacing insensitive; a folded alias match is not a
/// substitution and produces no warning.
pub fn normalize_team_strength(raw: &str) -> (TeamStrength, Option<ValidationWarning>) {
    let folded = fold_key(raw);
    TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map_or_else(
            || {
                let substituted = TeamStrength::default();
                (
                    substituted,
                    Some(ValidationWarning::TeamStrength {
                        raw: raw.to_string(),
                        substituted,
                    }),
                )
            },
            |(_, strength)| (*strength, None),
        )
}

/// Normalizes a duration in hours.
pub fn normalize_duration(raw: i64) -> (u32, Option<ValidationWarning>) {
    match u32::try_from(raw) {
        Ok(hours) if (MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&raw) => (hours, None),
        _ => (
            DEFAULT_DURATION_HOURS,
            Some(ValidationWarning::Duration {
                raw,
                substituted: DEFAULT_DURATION_HOURS,
            }),
        ),
    }
}

/// Normalizes both inputs, collecting warnings in input order.
pub fn normalize(team_strength_raw: &str, duration_raw: i64) -> NormalizedInput {
    let (team_strength, team_warning) = normalize_team_strength(team_strength_raw);
    let (duration_hours, duration_warning) = normalize_duration(duration_raw);

    NormalizedInput {
        team_strength,
        duration_hours,
        warnings: team_warning.into_iter().chain(duration_warning).collect(),
    }
}
