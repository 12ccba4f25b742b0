//! Assertions over pipeline results.

use crate::core::{PipelineState, StageName};
use crate::output::ExtractionMethod;
use crate::pipeline::PipelineResult;

/// Asserts that every stage completed and the run reached `Done`.
pub fn assert_pipeline_succeeded(result: &PipelineResult) {
    assert!(
        result.success,
        "Expected success, got error: {:?}",
        result.error
    );
    assert_eq!(result.final_state, PipelineState::Done);
    assert_eq!(
        result.stage_results.iter().map(|r| r.stage).collect::<Vec<_>>(),
        StageName::ALL.to_vec(),
        "Expected all four stages in order"
    );
}

/// Asserts that the run failed at `stage`, keeping only earlier results.
pub fn assert_failed_at(result: &PipelineResult, stage: StageName) {
    assert!(!result.success, "Expected failure at {stage}, got success");
    assert_eq!(result.final_state, PipelineState::Error);
    assert_eq!(
        result.failed_stage(),
        Some(stage),
        "Expected failure at {stage}, got {:?}",
        result.error
    );
    assert_eq!(
        result.stage_results.len(),
        stage.index(),
        "Expected {} completed stages before {stage}",
        stage.index()
    );
}

/// Asserts that the run succeeded with a synthesized pitch.
pub fn assert_pitch_fallback(result: &PipelineResult) {
    assert_pipeline_succeeded(result);
    assert!(
        result.metadata.pitch_is_fallback,
        "Expected pitch_is_fallback, metadata: {:?}",
        result.metadata
    );
    let pitch = result.stage_result(StageName::Pitch);
    assert_eq!(
        pitch.map(|r| r.extraction_method_used),
        Some(ExtractionMethod::FallbackSynthesis)
    );
}
