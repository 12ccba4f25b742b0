//! Testing utilities for strategist pipelines.
//!
//! This module provides:
//! - A scripted text generator that records the requests it receives
//! - Sample stage outputs and requests
//! - Assertions over pipeline results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_failed_at, assert_pipeline_succeeded, assert_pitch_fallback};
pub use fixtures::{sample_crew_output, sample_request, sample_stage_output, sample_task_output};
pub use mocks::ScriptedGenerator;
