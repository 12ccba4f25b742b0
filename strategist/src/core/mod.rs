//! Core domain model types for the strategist pipeline.
//!
//! This module contains the fundamental types used throughout the crate:
//! - The four pipeline stages and their ordering
//! - The pipeline state machine
//! - The closed set of team strengths

mod stage;
mod state;
mod team;

pub use stage::StageName;
pub use state::PipelineState;
pub use team::TeamStrength;
