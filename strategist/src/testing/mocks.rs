//! Scripted generator for driving pipelines without a backend.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use super::fixtures::sample_stage_output;
use crate::core::StageName;
use crate::errors::GenerationError;
use crate::stages::{RawStageResult, StageRequest, TextGenerator};

type Scripted = Result<RawStageResult, GenerationError>;

/// A generator that answers each stage from a script and records every
/// request it receives.
///
/// Unscripted stages answer with [`sample_stage_output`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Mutex<HashMap<StageName, Scripted>>,
    requests: Mutex<Vec<StageRequest>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    /// Creates a generator answering every stage with sample text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `stage` with `raw`.
    #[must_use]
    pub fn with_response(self, stage: StageName, raw: impl Into<RawStageResult>) -> Self {
        self.script.lock().insert(stage, Ok(raw.into()));
        self
    }

    /// Fails `stage` with `error`.
    #[must_use]
    pub fn with_error(self, stage: StageName, error: GenerationError) -> Self {
        self.script.lock().insert(stage, Err(error));
        self
    }

    /// Sleeps for `delay` before every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All requests received, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<StageRequest> {
        self.requests.lock().clone()
    }

    /// Requests received for one stage.
    #[must_use]
    pub fn requests_for(&self, stage: StageName) -> Vec<StageRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.stage == stage)
            .cloned()
            .collect()
    }

    /// Number of generation calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Stages called, in call order.
    #[must_use]
    pub fn called_stages(&self) -> Vec<StageName> {
        self.requests.lock().iter().map(|r| r.stage).collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &StageRequest) -> Result<RawStageResult, GenerationError> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().get(&request.stage).cloned();
        scripted.unwrap_or_else(|| Ok(RawStageResult::from(sample_stage_output(request.stage))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::PromptPayload;

    #[tokio::test]
    async fn test_scripted_and_default_answers() {
        let generator = ScriptedGenerator::new()
            .with_error(StageName::Critique, GenerationError::Request("down".into()));

        let research = StageRequest::new(StageName::Research, PromptPayload::text("r"), Vec::new());
        let critique = StageRequest::new(StageName::Critique, PromptPayload::text("c"), Vec::new());

        let raw = generator.generate(&research).await.unwrap();
        assert_eq!(raw.primary_text(), Some(sample_stage_output(StageName::Research)));
        assert!(generator.generate(&critique).await.is_err());

        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.called_stages(), vec![StageName::Research, StageName::Critique]);
        assert_eq!(generator.requests_for(StageName::Critique).len(), 1);
    }
}
