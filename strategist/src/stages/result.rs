//! Per-stage results.

use crate::core::StageName;
use crate::output::{ExtractionMethod, QualityReport};
use crate::utils::Timestamp;
use serde::{Deserialize, Serialize};

/// Outcome of one completed stage. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    /// Which stage produced this.
    pub stage: StageName,
    /// Character length of the extracted text before cleaning.
    pub raw_char_length: usize,
    /// Cleaned text; fed unchanged into later stages.
    pub cleaned_text: String,
    /// How the text was obtained.
    pub extraction_method_used: ExtractionMethod,
    /// Advisory score in `[0, 1]`.
    pub quality_score: f64,
    /// Per-check breakdown behind `quality_score`.
    pub quality: QualityReport,
    /// Wall-clock duration of the stage.
    pub duration_seconds: f64,
    /// When the stage started.
    pub started_at: Timestamp,
    /// True when only last-resort extraction found short text.
    #[serde(default)]
    pub suspicious_extraction: bool,
}

impl StageResult {
    /// True when the text was synthesized rather than generated.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.extraction_method_used == ExtractionMethod::FallbackSynthesis
    }

    /// Duration in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn duration_ms(&self) -> u64 {
        (self.duration_seconds * 1000.0).round() as u64
    }
}
