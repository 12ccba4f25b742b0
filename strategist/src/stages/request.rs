//! Stage requests and the prompt-construction seam.
//!
//! The orchestrator supplies positional context (stage, request, upstream
//! outputs); what the prompt says is entirely up to the
//! [`StageRequestBuilder`] implementation.

use crate::core::{StageName, TeamStrength};
use crate::input::PipelineRequest;
use serde::{Deserialize, Serialize};

/// Prompt content for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptPayload {
    /// A single free-form prompt.
    Text {
        /// Prompt text.
        text: String,
    },
    /// An agent/task style prompt.
    Structured {
        /// Persona the model should adopt.
        role: String,
        /// Background for the persona.
        backstory: String,
        /// What to do.
        description: String,
        /// What the answer should look like.
        expected_output: String,
    },
}

impl PromptPayload {
    /// Creates a free-form prompt.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Flattens the payload into a single prompt string.
    #[must_use]
    pub fn to_prompt_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Structured {
                role,
                backstory,
                description,
                expected_output,
            } => format!(
                "{role}\n\n{backstory}\n\n{description}\n\nExpected output: {expected_output}"
            ),
        }
    }
}

/// Everything one stage's generation call needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRequest {
    /// The stage being run.
    pub stage: StageName,
    /// Prompt content.
    pub prompt: PromptPayload,
    /// Cleaned outputs of every earlier stage, in stage order.
    pub upstream_outputs: Vec<String>,
}

impl StageRequest {
    /// Creates a new stage request.
    #[must_use]
    pub fn new(stage: StageName, prompt: PromptPayload, upstream_outputs: Vec<String>) -> Self {
        Self {
            stage,
            prompt,
            upstream_outputs,
        }
    }

    /// Output of the stage immediately before this one.
    #[must_use]
    pub fn previous_output(&self) -> Option<&str> {
        self.upstream_outputs.last().map(String::as_str)
    }
}

/// Builds the generation request for a stage.
pub trait StageRequestBuilder: Send + Sync {
    /// Builds the request for `stage`.
    ///
    /// `upstream_outputs[i]` is the cleaned output of `StageName::ALL[i]`.
    fn build_stage_request(
        &self,
        stage: StageName,
        request: &PipelineRequest,
        upstream_outputs: &[String],
    ) -> StageRequest;
}

/// Team-specific focus used to tailor the architecture prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamFocus {
    /// What the plan should prioritise.
    pub priority: &'static str,
    /// What the team should be able to deliver.
    pub delivery: &'static str,
    /// The persona's expertise.
    pub expertise: &'static str,
}

/// Focus areas for a team strength.
#[must_use]
pub const fn team_focus(strength: TeamStrength) -> TeamFocus {
    match strength {
        TeamStrength::Frontend => TeamFocus {
            priority: "user experience and visual appeal",
            delivery: "polished UI/UX with responsive design",
            expertise: "Modern frontend frameworks, UI/UX design, responsive development",
        },
        TeamStrength::Backend => TeamFocus {
            priority: "robust APIs and data architecture",
            delivery: "scalable backend services with proper data flow",
            expertise: "API development, database design, server architecture",
        },
        TeamStrength::AiMl => TeamFocus {
            priority: "intelligent features and data processing",
            delivery: "working AI/ML models with clear value demonstration",
            expertise: "Machine learning algorithms, data preprocessing, model deployment",
        },
        TeamStrength::FullStack => TeamFocus {
            priority: "complete end-to-end solution",
            delivery: "integrated full-stack application with balanced features",
            expertise: "Full-stack development, system integration, balanced architecture",
        },
    }
}

/// Architectural constraint implied by the event length.
#[must_use]
pub const fn time_constraint(duration_hours: u32) -> &'static str {
    match duration_hours {
        0..=8 => "Ultra-tight timeline - focus on core MVP with minimal complexity",
        9..=24 => "Standard hackathon timeline - balanced features with smart shortcuts",
        25..=48 => "Extended timeline - opportunity for polished features and testing",
        _ => "Marathon timeline - comprehensive solution with quality focus",
    }
}

/// Default agent/task style prompts for the four stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPromptBuilder;

impl DefaultPromptBuilder {
    /// Creates a new default prompt builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StageRequestBuilder for DefaultPromptBuilder {
    fn build_stage_request(
        &self,
        stage: StageName,
        request: &PipelineRequest,
        upstream_outputs: &[String],
    ) -> StageRequest {
        let upstream = |s: StageName| upstream_outputs.get(s.index()).map_or("", String::as_str);
        let team = request.team_strength;
        let hours = request.duration_hours;

        let prompt = match stage {
            StageName::Research => PromptPayload::Structured {
                role: "Expert Market Research Analyst".to_string(),
                backstory: "You are a seasoned market research analyst who bases every \
                            claim on facts found through search."
                    .to_string(),
                description: format!(
                    "Analyze the hackathon idea '{}' within the theme '{}'. Cover: \
                     1. Market Demand, in one or two sentences. \
                     2. Key Competitors, the top two or three. \
                     3. Tech Stack, one or two essential technologies or APIs for an MVP \
                     that a {team} team can ship in {hours} hours.",
                    request.idea, request.theme
                ),
                expected_output: "A concise report with headings for Market Demand, Key \
                                  Competitors, and Tech Stack."
                    .to_string(),
            },
            StageName::Critique => PromptPayload::Structured {
                role: "Idea Validation and Critical Analysis Agent".to_string(),
                backstory: "You stress-test hackathon ideas for weaknesses, scope creep and \
                            lack of novelty."
                    .to_string(),
                description: format!(
                    "Critically analyze the following research report:\n{}\n\nHighlight the \
                     main risks for a {team} team with {hours} hours.",
                    upstream(StageName::Research)
                ),
                expected_output: "A brief critical analysis in markdown outlining risks, \
                                  competitive challenges and flaws."
                    .to_string(),
            },
            StageName::Architecture => {
                let focus = team_focus(team);
                PromptPayload::Structured {
                    role: format!("{team} Solution Architect"),
                    backstory: format!(
                        "You are an experienced solution architect specializing in {team} \
                         development. Your expertise: {}. You always consider: {}.",
                        focus.expertise,
                        time_constraint(hours)
                    ),
                    description: format!(
                        "Define a concrete, feasible MVP.\n- Initial Idea: {}\n- Research \
                         Report: {}\n- Critical Analysis: {}\n- Team's Core Strength: {team}\n\
                         - Duration: {hours} hours\nFocus on {} and ensure {}.",
                        request.idea,
                        upstream(StageName::Research),
                        upstream(StageName::Critique),
                        focus.priority,
                        focus.delivery
                    ),
                    expected_output: "A structured MVP plan with a title, summary, core \
                                      features, technical architecture, and an hour-by-hour \
                                      timeline."
                        .to_string(),
                }
            }
            StageName::Pitch => PromptPayload::Structured {
                role: "Narrative and Pitch Synthesis Agent".to_string(),
                backstory: "You turn technical plans into persuasive three-minute demos."
                    .to_string(),
                description: format!(
                    "Synthesize this MVP plan into a pitch outline for a 3-minute demo:\n{}",
                    upstream(StageName::Architecture)
                ),
                expected_output: "A markdown pitch storyboard with sections for the hook, \
                                  solution, live demo, reveal and close. Only the markdown."
                    .to_string(),
            },
        };

        StageRequest::new(stage, prompt, upstream_outputs.to_vec())
    }
}
