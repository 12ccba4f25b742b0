//! Pipeline orchestration.
//!
//! This module provides:
//! - The orchestrator that sequences the four stages
//! - Result, error and warning types for a run
//! - Deterministic pitch synthesis used when the final stage is unusable

mod fallback;
mod orchestrator;
mod result;


pub use fallback::synthesize_pitch;
pub use orchestrator::PipelineOrchestrator;
pub use result::{
    FallbackReason, PipelineError, PipelineErrorKind, PipelineMetadata, PipelineResult,
    PipelineWarning, StrategyResponse,
};
