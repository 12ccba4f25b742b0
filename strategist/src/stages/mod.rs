//! Stage execution: requests, raw results and the generation seam.
//!
//! A stage is one call to a [`TextGenerator`]. The [`StageExecutor`] makes
//! exactly that call and turns budget exhaustion into an error; it never
//! retries.

mod raw;
mod request;
mod result;

pub use raw::{CrewOutput, RawStageResult, TaskOutput, BUDGET_SENTINEL};
pub use request::{
    team_focus, time_constraint, DefaultPromptBuilder, PromptPayload, StageRequest,
    StageRequestBuilder, TeamFocus,
};
pub use result::StageResult;

use crate::errors::GenerationError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A text-generation backend.
///
/// Implementations perform one external call per invocation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a raw result for `request`.
    async fn generate(&self, request: &StageRequest) -> Result<RawStageResult, GenerationError>;
}

/// Runs a single stage against a generator.
#[derive(Clone)]
pub struct StageExecutor {
    generator: Arc<dyn TextGenerator>,
}

impl fmt::Debug for StageExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageExecutor").finish_non_exhaustive()
    }
}

impl StageExecutor {
    /// Creates an executor over `generator`.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Executes one generation call.
    ///
    /// A result that reports an exhausted iteration or time budget is an
    /// error even though the call returned.
    pub async fn execute(&self, request: &StageRequest) -> Result<RawStageResult, GenerationError> {
        let raw = self.generator.generate(request).await?;

        if raw.is_budget_exhausted() {
            tracing::warn!(
                stage = request.stage.as_str(),
                finish_reason = raw.finish_reason().unwrap_or("sentinel"),
                "Generation stopped on its budget"
            );
            return Err(GenerationError::BudgetExhausted(request.stage.to_string()));
        }

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;
    use mockall::predicate::function;

    fn request(stage: StageName) -> StageRequest {
        StageRequest::new(stage, PromptPayload::text("prompt"), Vec::new())
    }

    #[tokio::test]
    async fn test_passes_result_through() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .with(function(|r: &StageRequest| r.stage == StageName::Critique))
            .times(1)
            .returning(|_| Ok(RawStageResult::from("a critique of reasonable length")));

        let executor = StageExecutor::new(Arc::new(generator));
        let raw = executor.execute(&request(StageName::Critique)).await.unwrap();
        assert_eq!(raw, RawStageResult::from("a critique of reasonable length"));
    }

    #[tokio::test]
    async fn test_error_is_not_retried() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(GenerationError::Timeout { seconds: 120.0 }));

        let executor = StageExecutor::new(Arc::new(generator));
        let err = executor.execute(&request(StageName::Research)).await.unwrap_err();
        assert_eq!(err.error_type(), "timeout");
    }

    #[tokio::test]
    async fn test_budget_finish_reason() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Ok(RawStageResult::Task(TaskOutput {
                raw: Some("partial answer that looks long enough".into()),
                finish_reason: Some("iteration_limit".into()),
                ..TaskOutput::default()
            }))
        });

        let executor = StageExecutor::new(Arc::new(generator));
        let err = executor.execute(&request(StageName::Architecture)).await.unwrap_err();
        assert!(matches!(err, GenerationError::BudgetExhausted(ref stage) if stage == "architecture"));
    }

    #[tokio::test]
    async fn test_budget_sentinel_text() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Ok(RawStageResult::from(BUDGET_SENTINEL)));

        let executor = StageExecutor::new(Arc::new(generator));
        let err = executor.execute(&request(StageName::Pitch)).await.unwrap_err();
        assert_eq!(err.error_type(), "budget_exhausted");
    }

    #[test]
    fn test_execute_blocking() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok(RawStageResult::Empty));

        let executor = StageExecutor::new(Arc::new(generator));
        let raw = tokio_test::block_on(executor.execute(&request(StageName::Research))).unwrap();
        assert_eq!(raw, RawStageResult::Empty);
    }
}
