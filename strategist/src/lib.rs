//! # Strategist
//!
//! A four-stage LLM strategy pipeline for hackathon ideas: research,
//! critique, architecture and pitch, run strictly in sequence.
//!
//! Strategist provides:
//!
//! - **Input normalization**: team strength aliasing and duration clamping
//! - **Defensive output handling**: ordered-fallback extraction from whatever
//!   shape a backend returns, fence and prefix cleaning, quality scoring
//! - **Graceful degradation**: a deterministic pitch when the final stage is unusable
//! - **Event-driven observability**: lifecycle events through an injected sink
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strategist::prelude::*;
//! use std::sync::Arc;
//!
//! let config = StrategistConfig::from_env()?;
//! let generator = OpenAiCompatibleGenerator::new(config.generation.clone())?;
//! let orchestrator = PipelineOrchestrator::new(Arc::new(generator), config)
//!     .with_event_sink(Arc::new(LoggingEventSink::default()));
//!
//! let result = orchestrator
//!     .run("AI in Education", "Language learning app", "AI/ML", 24)
//!     .await;
//! let response = StrategyResponse::from(&result);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod input;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::StrategistConfig;
    pub use crate::core::{PipelineState, StageName, TeamStrength};
    pub use crate::errors::{
        ConfigError, ExtractionError, GenerationError, StrategistError,
    };
    pub use crate::events::{
        CollectingEventSink, EventSink, EventType, LoggingEventSink, NoOpEventSink,
        PipelineEvent,
    };
    pub use crate::input::{PipelineRequest, ValidationWarning};
    pub use crate::observability::{init_logging, LogFormat};
    pub use crate::output::{
        clean, ExtractionMethod, OutputCleaner, OutputExtractor, QualityReport,
        QualityValidator,
    };
    pub use crate::pipeline::{
        PipelineOrchestrator, PipelineResult, PipelineWarning, StrategyResponse,
    };
    #[cfg(feature = "http")]
    pub use crate::providers::OpenAiCompatibleGenerator;
    pub use crate::stages::{
        DefaultPromptBuilder, RawStageResult, StageRequest, StageRequestBuilder,
        StageResult, TextGenerator,
    };
}
