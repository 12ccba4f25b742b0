//! Lifecycle events emitted during a pipeline run.
//!
//! Sinks are injected into the orchestrator; there is no process-global
//! sink, so concurrent runs never share event state.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::core::StageName;
use crate::utils::{now_utc, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kinds of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// A run began.
    #[serde(rename = "pipeline.started")]
    PipelineStarted,
    /// A stage began.
    #[serde(rename = "stage.started")]
    StageStarted,
    /// A stage produced a result.
    #[serde(rename = "stage.completed")]
    StageCompleted,
    /// A stage failed fatally.
    #[serde(rename = "stage.failed")]
    StageFailed,
    /// The final stage used synthesized content.
    #[serde(rename = "stage.fallback")]
    StageFallback,
    /// A stage scored under the quality threshold.
    #[serde(rename = "quality.low")]
    QualityLow,
    /// A run finished successfully.
    #[serde(rename = "pipeline.completed")]
    PipelineCompleted,
    /// A run halted on a fatal error.
    #[serde(rename = "pipeline.failed")]
    PipelineFailed,
}

impl EventType {
    /// Dotted event name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PipelineStarted => "pipeline.started",
            Self::StageStarted => "stage.started",
            Self::StageCompleted => "stage.completed",
            Self::StageFailed => "stage.failed",
            Self::StageFallback => "stage.fallback",
            Self::QualityLow => "quality.low",
            Self::PipelineCompleted => "pipeline.completed",
            Self::PipelineFailed => "pipeline.failed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// What happened.
    pub event_type: EventType,
    /// The run it belongs to.
    pub run_id: Uuid,
    /// The stage involved, for stage-level events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageName>,
    /// When it happened.
    pub timestamp: Timestamp,
    /// Event-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl PipelineEvent {
    /// Creates an event with an empty payload.
    #[must_use]
    pub fn new(event_type: EventType, run_id: Uuid) -> Self {
        Self {
            event_type,
            run_id,
            stage: None,
            timestamp: now_utc(),
            data: serde_json::Value::Null,
        }
    }

    /// Sets the stage.
    #[must_use]
    pub fn with_stage(mut self, stage: StageName) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generate_run_id;

    #[test]
    fn test_event_serialization() {
        let run_id = generate_run_id();
        let event = PipelineEvent::new(EventType::StageFallback, run_id)
            .with_stage(StageName::Pitch)
            .with_data(serde_json::json!({"reason": "too_short"}));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event_type"], "stage.fallback");
        assert_eq!(json["stage"], "pitch");
        assert_eq!(json["run_id"], run_id.to_string());
        assert_eq!(json["data"]["reason"], "too_short");
    }

    #[test]
    fn test_pipeline_level_event_omits_stage() {
        let event = PipelineEvent::new(EventType::PipelineStarted, generate_run_id());
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("stage").is_none());
        assert_eq!(EventType::QualityLow.to_string(), "quality.low");
    }
}
