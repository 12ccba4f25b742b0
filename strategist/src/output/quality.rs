//! Advisory quality scoring for cleaned stage text.

use crate::core::TeamStrength;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Phrases that signal non-committal advice.
pub const HEDGING_PHRASES: &[&str] = &[
    "consider using",
    "could potentially",
    "might want to",
    "you may want",
    "it might be",
];

/// Technology keywords; at least one must appear.
pub const TECH_KEYWORDS: &[&str] = &[
    "api",
    "react",
    "python",
    "database",
    "framework",
    "model",
    "fastapi",
    "node",
    "javascript",
    "typescript",
    "docker",
    "sql",
    "llm",
];

/// Time and urgency keywords; at least one must appear.
pub const TIME_KEYWORDS: &[&str] = &[
    "hour", "hours", "day", "days", "deadline", "timeline", "sprint", "minute", "minutes",
];

/// One independent boolean heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCheck {
    /// Text names the team strength.
    MentionsTeamStrength,
    /// Text contains none of the hedging phrases.
    AvoidsHedging,
    /// Text names at least one technology.
    HasTechKeyword,
    /// Text names at least one time unit or urgency word.
    HasTimeKeyword,
}

impl QualityCheck {
    /// All checks, in reporting order.
    pub const ALL: [Self; 4] = [
        Self::MentionsTeamStrength,
        Self::AvoidsHedging,
        Self::HasTechKeyword,
        Self::HasTimeKeyword,
    ];

    /// Stable name used as the report key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MentionsTeamStrength => "mentions_team_strength",
            Self::AvoidsHedging => "avoids_hedging",
            Self::HasTechKeyword => "has_tech_keyword",
            Self::HasTimeKeyword => "has_time_keyword",
        }
    }
}

impl fmt::Display for QualityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Result of each check, keyed by check name.
    pub checks: BTreeMap<String, bool>,
    /// Fraction of checks that passed, in `[0, 1]`.
    pub score: f64,
}

impl QualityReport {
    /// Number of checks that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.checks.values().filter(|passed| **passed).count()
    }

    /// Result of a single check, if it ran.
    #[must_use]
    pub fn check(&self, check: QualityCheck) -> Option<bool> {
        self.checks.get(check.as_str()).copied()
    }

    /// Returns true when the score is under `threshold`.
    #[must_use]
    pub fn is_below(&self, threshold: f64) -> bool {
        self.score < threshold
    }
}

/// Builds a case-insensitive alternation matched on word boundaries.
fn word_regex(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
        .unwrap_or_else(|e| unreachable!("escaped keywords form a valid pattern: {e}"))
}

/// Scores text against a fixed set of heuristics.
///
/// The score is advisory: it never blocks a pipeline run.
#[derive(Debug, Clone)]
pub struct QualityValidator {
    checks: Vec<QualityCheck>,
    hedging: Regex,
    tech: Regex,
    time: Regex,
    team: BTreeMap<&'static str, Regex>,
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::with_checks(QualityCheck::ALL.to_vec())
    }
}

impl QualityValidator {
    /// Creates a validator running all checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator running only `checks`. An empty set scores 0.0.
    #[must_use]
    pub fn with_checks(checks: Vec<QualityCheck>) -> Self {
        let team = TeamStrength::ALL
            .iter()
            .map(|strength| (strength.label(), word_regex(strength.mention_tokens())))
            .collect();
        Self {
            checks,
            hedging: word_regex(HEDGING_PHRASES),
            tech: word_regex(TECH_KEYWORDS),
            time: word_regex(TIME_KEYWORDS),
            team,
        }
    }

    /// The checks this validator runs.
    #[must_use]
    pub fn checks(&self) -> &[QualityCheck] {
        &self.checks
    }

    /// Scores `text` for a team of the given strength.
    #[must_use]
    pub fn score(&self, text: &str, team_strength: TeamStrength) -> QualityReport {
        let checks: BTreeMap<String, bool> = self
            .checks
            .iter()
            .map(|check| (check.as_str().to_string(), self.run(*check, text, team_strength)))
            .collect();

        let passed = checks.values().filter(|passed| **passed).count();
        #[allow(clippy::cast_precision_loss)]
        let score = if checks.is_empty() {
            0.0
        } else {
            passed as f64 / checks.len() as f64
        };

        QualityReport { checks, score }
    }

    fn run(&self, check: QualityCheck, text: &str, team_strength: TeamStrength) -> bool {
        match check {
            QualityCheck::MentionsTeamStrength => self
                .team
                .get(team_strength.label())
                .is_some_and(|re| re.is_match(text)),
            QualityCheck::AvoidsHedging => !self.hedging.is_match(text),
            QualityCheck::HasTechKeyword => self.tech.is_match(text),
            QualityCheck::HasTimeKeyword => self.time.is_match(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STRONG: &str = "Our Backend team ships a FastAPI service with a Postgres database \
                          in 24 hours, demo at the deadline.";

    #[test]
    fn test_all_checks_pass() {
        let report = QualityValidator::default().score(STRONG, TeamStrength::Backend);
        assert_eq!(report.passed(), 4);
        assert!((report.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hedging_fails_check() {
        let text = format!("{STRONG} You might want to add caching.");
        let report = QualityValidator::default().score(&text, TeamStrength::Backend);

        assert_eq!(report.check(QualityCheck::AvoidsHedging), Some(false));
        assert!((report.score - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wrong_team_strength() {
        let report = QualityValidator::default().score(STRONG, TeamStrength::Frontend);
        assert_eq!(report.check(QualityCheck::MentionsTeamStrength), Some(false));
    }

    #[test]
    fn test_team_strength_variants() {
        let validator = QualityValidator::default();
        let report = validator.score("A machine learning pipeline", TeamStrength::AiMl);
        assert_eq!(report.check(QualityCheck::MentionsTeamStrength), Some(true));

        let report = validator.score("Our full stack crew", TeamStrength::FullStack);
        assert_eq!(report.check(QualityCheck::MentionsTeamStrength), Some(true));
    }

    #[test]
    fn test_keywords_match_whole_words() {
        let validator = QualityValidator::default();
        // "rapid" contains "api", "today" contains "day".
        let report = validator.score("A rapid prototype today", TeamStrength::Backend);
        assert_eq!(report.check(QualityCheck::HasTechKeyword), Some(false));
        assert_eq!(report.check(QualityCheck::HasTimeKeyword), Some(false));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let report = QualityValidator::default().score("REACT over a WEEKEND DAY", TeamStrength::Frontend);
        assert_eq!(report.check(QualityCheck::HasTechKeyword), Some(true));
        assert_eq!(report.check(QualityCheck::HasTimeKeyword), Some(true));
    }

    #[test]
    fn test_empty_check_set_scores_zero() {
        let report = QualityValidator::with_checks(Vec::new()).score(STRONG, TeamStrength::Backend);
        assert!(report.checks.is_empty());
        assert!(report.score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_subset_of_checks() {
        let validator = QualityValidator::with_checks(vec![QualityCheck::HasTimeKeyword]);
        let report = validator.score("Two hours left", TeamStrength::Backend);
        assert_eq!(report.checks.len(), 1);
        assert!((report.score - 1.0).abs() < f64::EPSILON);
        assert!(!report.is_below(0.5));
    }

    #[test]
    fn test_report_keys() {
        let report = QualityValidator::default().score("", TeamStrength::Backend);
        let keys: Vec<_> = report.checks.keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["avoids_hedging", "has_tech_keyword", "has_time_keyword", "mentions_team_strength"]
        );
        // Empty text still avoids hedging.
        assert!((report.score - 0.25).abs() < f64::EPSILON);
    }
}
