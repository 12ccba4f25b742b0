//! Pipeline results, errors, warnings and the flat response view.

use crate::core::{PipelineState, StageName};
use crate::errors::StrategistError;
use crate::input::{PipelineRequest, ValidationWarning};
use crate::output::ExtractionMethod;
use crate::stages::StageResult;
use crate::utils::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Where and how a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "stage", rename_all = "snake_case")]
pub enum PipelineErrorKind {
    /// The generation call failed or ran out of budget.
    Generation(StageName),
    /// No usable text could be recovered from the raw result.
    Extraction(StageName),
}

impl PipelineErrorKind {
    /// The stage the failure originated at.
    #[must_use]
    pub const fn stage(&self) -> StageName {
        match self {
            Self::Generation(stage) | Self::Extraction(stage) => *stage,
        }
    }
}

impl fmt::Display for PipelineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation(stage) => write!(f, "generation failed at {stage}"),
            Self::Extraction(stage) => write!(f, "extraction failed at {stage}"),
        }
    }
}

/// The fatal error that halted a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineError {
    /// Failure category and stage.
    pub kind: PipelineErrorKind,
    /// Underlying error message.
    pub message: String,
    /// Stable name of the underlying error.
    pub error_type: String,
    /// Time from run start to the failure.
    pub elapsed_seconds: f64,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.message, self.error_type)
    }
}

/// Why the final stage used synthesized content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The cleaned text was under the minimum viable length.
    TooShort {
        /// Character length of the rejected text.
        length: usize,
        /// The minimum it had to reach.
        min_length: usize,
    },
    /// No text could be extracted, or cleaning left nothing.
    ExtractionFailed {
        /// The extraction error message.
        message: String,
    },
    /// The generation call itself failed.
    GenerationFailed {
        /// The generation error message.
        message: String,
    },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { length, min_length } => {
                write!(f, "pitch too short ({length} < {min_length} chars)")
            }
            Self::ExtractionFailed { message } => write!(f, "pitch extraction failed: {message}"),
            Self::GenerationFailed { message } => write!(f, "pitch generation failed: {message}"),
        }
    }
}

/// A non-fatal condition observed during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// An input was corrected by substitution.
    Validation {
        /// The substitution made.
        warning: ValidationWarning,
    },
    /// A stage scored under the advisory threshold.
    LowQuality {
        /// The stage.
        stage: StageName,
        /// Its score.
        score: f64,
        /// The threshold it missed.
        threshold: f64,
    },
    /// Text came only from last-resort extraction and is short.
    SuspiciousExtraction {
        /// The stage.
        stage: StageName,
        /// The method that produced it.
        method: ExtractionMethod,
        /// Trimmed character length of the text.
        length: usize,
    },
    /// The final stage used synthesized content.
    PitchFallback {
        /// Why.
        reason: FallbackReason,
    },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { warning } => write!(f, "{warning}"),
            Self::LowQuality {
                stage,
                score,
                threshold,
            } => write!(f, "{stage} quality {score:.2} below {threshold:.2}"),
            Self::SuspiciousExtraction {
                stage,
                method,
                length,
            } => write!(f, "{stage} text of {length} chars only found via {method}"),
            Self::PitchFallback { reason } => write!(f, "{reason}"),
        }
    }
}

impl From<ValidationWarning> for PipelineWarning {
    fn from(warning: ValidationWarning) -> Self {
        Self::Validation { warning }
    }
}

/// Run-level flags and aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// True when the final stage text was synthesized, not generated.
    pub pitch_is_fallback: bool,
    /// Why synthesis was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_fallback_reason: Option<FallbackReason>,
    /// Quality score per completed stage, keyed by stage name.
    pub quality_scores: BTreeMap<String, f64>,
}

/// Terminal artifact of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// True when all four stages produced a result.
    pub success: bool,
    /// Completed stages in order; partial on failure.
    pub stage_results: Vec<StageResult>,
    /// Wall-clock duration of the whole run.
    pub total_duration_seconds: f64,
    /// The fatal error, when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PipelineError>,
    /// Non-fatal conditions, in the order observed.
    #[serde(default)]
    pub warnings: Vec<PipelineWarning>,
    /// Run-level flags.
    #[serde(default)]
    pub metadata: PipelineMetadata,
    /// The normalized request that was run.
    pub request: PipelineRequest,
    /// `Done` or `Error`.
    pub final_state: PipelineState,
    /// When the run started.
    pub started_at: Timestamp,
}

impl PipelineResult {
    /// The result of one stage, if it completed.
    #[must_use]
    pub fn stage_result(&self, stage: StageName) -> Option<&StageResult> {
        self.stage_results.iter().find(|r| r.stage == stage)
    }

    /// Cleaned text of one stage, if it completed.
    #[must_use]
    pub fn text(&self, stage: StageName) -> Option<&str> {
        self.stage_result(stage).map(|r| r.cleaned_text.as_str())
    }

    /// The stage the run failed at.
    #[must_use]
    pub fn failed_stage(&self) -> Option<StageName> {
        self.error.as_ref().map(|e| e.kind.stage())
    }

    /// True when the run succeeded with synthesized final content.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.success && self.metadata.pitch_is_fallback
    }

    /// Serializes the result as pretty JSON.
    pub fn to_json(&self) -> Result<String, StrategistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Flat response shape returned to HTTP callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyResponse {
    /// Whether the run succeeded.
    pub success: bool,
    /// Research stage text.
    pub research: String,
    /// Critique stage text.
    pub critical_analysis: String,
    /// Architecture stage text.
    pub mvp_plan: String,
    /// Pitch stage text.
    pub pitch: String,
    /// Canonical team strength label.
    pub team_strength: String,
    /// Duration in hours.
    pub hackathon_duration: u32,
    /// Error message, empty on success.
    pub error: String,
}

impl From<&PipelineResult> for StrategyResponse {
    fn from(result: &PipelineResult) -> Self {
        let text = |stage| result.text(stage).unwrap_or_default().to_string();
        Self {
            success: result.success,
            research: text(StageName::Research),
            critical_analysis: text(StageName::Critique),
            mvp_plan: text(StageName::Architecture),
            pitch: text(StageName::Pitch),
            team_strength: result.request.team_strength.label().to_string(),
            hackathon_duration: result.request.duration_hours,
            error: result
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TeamStrength;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_kind_serialization() {
        let kind = PipelineErrorKind::Generation(StageName::Critique);
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, serde_json::json!({"type": "generation", "stage": "critique"}));
        assert_eq!(kind.stage(), StageName::Critique);
    }

    #[test]
    fn test_warning_serialization() {
        let warning = PipelineWarning::from(ValidationWarning::Duration {
            raw: 0,
            substituted: 24,
        });
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["warning"]["field"], "duration");

        let warning = PipelineWarning::PitchFallback {
            reason: FallbackReason::TooShort {
                length: 10,
                min_length: 50,
            },
        };
        assert_eq!(warning.to_string(), "pitch too short (10 < 50 chars)");
    }

    #[test]
    fn test_response_view_of_failed_run() {
        let result = PipelineResult {
            run_id: Uuid::nil(),
            success: false,
            stage_results: Vec::new(),
            total_duration_seconds: 0.5,
            error: Some(PipelineError {
                kind: PipelineErrorKind::Generation(StageName::Research),
                message: "connection refused".into(),
                error_type: "request_error".into(),
                elapsed_seconds: 0.5,
            }),
            warnings: Vec::new(),
            metadata: PipelineMetadata::default(),
            request: PipelineRequest::new("t", "i", TeamStrength::Backend, 12),
            final_state: PipelineState::Error,
            started_at: crate::utils::now_utc(),
        };

        let response = StrategyResponse::from(&result);
        assert!(!response.success);
        assert_eq!(response.research, "");
        assert_eq!(response.team_strength, "Backend");
        assert_eq!(response.hackathon_duration, 12);
        assert!(response.error.contains("research"));
        assert!(response.error.contains("connection refused"));
        assert_eq!(result.failed_stage(), Some(StageName::Research));
        assert!(!result.is_degraded());
    }
}
