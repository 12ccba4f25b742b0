//! Sample requests and stage outputs.

use crate::core::{StageName, TeamStrength};
use crate::input::PipelineRequest;
use crate::stages::{CrewOutput, RawStageResult, TaskOutput};

/// The request used across scenario tests.
#[must_use]
pub fn sample_request() -> PipelineRequest {
    PipelineRequest::new(
        "AI in Education",
        "Language learning app",
        TeamStrength::AiMl,
        9,
    )
}

/// Realistic generated text for a stage. Each one passes every quality
/// check for an AI/ML team.
#[must_use]
pub const fn sample_stage_output(stage: StageName) -> &'static str {
    match stage {
        StageName::Research => {
            "## Market Demand\nLanguage learners want daily conversation practice.\n\
             ## Key Competitors\nDuolingo, Babbel.\n\
             ## Tech Stack\nA Python FastAPI service calling an LLM, buildable by an AI/ML \
             team within 9 hours."
        }
        StageName::Critique => {
            "The main risk for an AI/ML team is scope: speech recognition will not fit in \
             9 hours. Competing with Duolingo on content is unrealistic, so focus the model \
             on one conversational scenario."
        }
        StageName::Architecture => {
            "## MVP Core Feature\nRole-play chat with instant grammar feedback.\n\
             ## Tech Stack\nReact frontend, FastAPI backend, hosted LLM API.\n\
             ## Team Roles\nThe AI/ML lead owns prompt and model evaluation.\n\
             ## Timeline\nHour 1-3 API, hour 4-7 UI, final 2 hours demo polish."
        }
        StageName::Pitch => {
            "Imagine practising a café order in Spanish at 2am. Our AI/ML team built a \
             role-play tutor in 9 hours: a React chat on a FastAPI backend with an LLM that \
             corrects your grammar as you speak. Watch it fix three mistakes live."
        }
    }
}

/// A single-task raw result holding `text` as its primary field.
#[must_use]
pub fn sample_task_output(text: &str) -> RawStageResult {
    RawStageResult::Task(TaskOutput::with_raw(text))
}

/// A multi-task raw result with an empty top level and `text` in the
/// first sub-result.
#[must_use]
pub fn sample_crew_output(text: &str) -> RawStageResult {
    RawStageResult::Crew(CrewOutput {
        tasks_output: vec![TaskOutput::with_raw(text)],
        ..CrewOutput::default()
    })
}
