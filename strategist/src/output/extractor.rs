//! Ordered-fallback extraction of text from raw stage results.

use crate::config::ExtractionConfig;
use crate::errors::ExtractionError;
use crate::stages::RawStageResult;
use crate::utils::{trimmed_len, truncate_chars};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The strategy that located a stage's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// The primary text field.
    #[serde(rename = "raw")]
    Raw,
    /// The `output` field.
    #[serde(rename = "output")]
    Output,
    /// The `result` field.
    #[serde(rename = "result")]
    Result,
    /// The primary text of the first sub-result.
    #[serde(rename = "tasks_output.raw")]
    SubResultRaw,
    /// The `output` field of the first sub-result.
    #[serde(rename = "tasks_output.output")]
    SubResultOutput,
    /// String conversion of the whole raw result.
    #[serde(rename = "string_conversion")]
    StringConversion,
    /// Not extracted: synthesized from upstream outputs.
    #[serde(rename = "fallback_synthesis")]
    FallbackSynthesis,
}

impl ExtractionMethod {
    /// Extraction strategies in priority order.
    pub const ORDER: [Self; 6] = [
        Self::Raw,
        Self::Output,
        Self::Result,
        Self::SubResultRaw,
        Self::SubResultOutput,
        Self::StringConversion,
    ];

    /// Stable name of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Output => "output",
            Self::Result => "result",
            Self::SubResultRaw => "tasks_output.raw",
            Self::SubResultOutput => "tasks_output.output",
            Self::StringConversion => "string_conversion",
            Self::FallbackSynthesis => "fallback_synthesis",
        }
    }

    /// Returns true for the last-resort method, which accepts short text.
    #[must_use]
    pub const fn is_last_resort(&self) -> bool {
        matches!(self, Self::StringConversion)
    }

    fn candidate(self, raw: &RawStageResult) -> Option<String> {
        match self {
            Self::Raw => raw.primary_text().map(str::to_string),
            Self::Output => raw.output_field().map(str::to_string),
            Self::Result => raw.result_field().map(str::to_string),
            Self::SubResultRaw => raw.first_sub_result().and_then(|t| t.raw.clone()),
            Self::SubResultOutput => raw.first_sub_result().and_then(|t| t.output.clone()),
            Self::StringConversion => Some(raw.render()),
            Self::FallbackSynthesis => None,
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located string and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The text exactly as found; extraction never edits content.
    pub text: String,
    /// The strategy that produced it.
    pub method: ExtractionMethod,
    /// True when only the last-resort method produced text, and that text
    /// does not exceed the length threshold.
    pub suspicious: bool,
}

/// Locates usable text in a raw result by trying each strategy in order.
#[derive(Debug, Clone)]
pub struct OutputExtractor {
    min_length: usize,
    preview_chars: usize,
}

impl Default for OutputExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl OutputExtractor {
    /// Creates an extractor from configuration.
    #[must_use]
    pub const fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_length: config.min_length,
            preview_chars: config.preview_chars,
        }
    }

    /// Strings must be strictly longer than this (after trimming) to qualify.
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Extracts the first qualifying string.
    ///
    /// Non-final methods must yield more than `min_length` characters; the
    /// last-resort string conversion accepts any non-blank text and flags
    /// short text as suspicious.
    pub fn extract(&self, raw: &RawStageResult) -> Result<Extraction, ExtractionError> {
        let mut attempted = Vec::with_capacity(ExtractionMethod::ORDER.len());

        for method in ExtractionMethod::ORDER {
            attempted.push(method);
            let Some(text) = method.candidate(raw) else {
                continue;
            };
            let len = trimmed_len(&text);

            if len > self.min_length {
                tracing::debug!(method = method.as_str(), len, "Extraction method succeeded");
                return Ok(Extraction {
                    text,
                    method,
                    suspicious: false,
                });
            }

            if method.is_last_resort() && len > 0 {
                tracing::warn!(
                    method = method.as_str(),
                    len,
                    min_length = self.min_length,
                    "Accepting short text from last-resort extraction"
                );
                return Ok(Extraction {
                    text,
                    method,
                    suspicious: true,
                });
            }

            tracing::debug!(method = method.as_str(), len, "Extraction candidate rejected");
        }

        Err(ExtractionError::exhausted(attempted, self.preview(raw)))
    }

    /// Truncated diagnostic rendering of a raw result.
    #[must_use]
    pub fn preview(&self, raw: &RawStageResult) -> String {
        let rendered = raw.render();
        if rendered.trim().is_empty() {
            truncate_chars(&format!("{raw:?}"), self.preview_chars)
        } else {
            truncate_chars(&rendered, self.preview_chars)
        }
    }
}
