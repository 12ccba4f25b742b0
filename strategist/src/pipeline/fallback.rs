//! Deterministic pitch synthesis from upstream outputs.

use crate::core::StageName;
use crate::input::PipelineRequest;
use crate::utils::truncate_chars;

const MISSING_ARCHITECTURE: &str = "The MVP architecture is summarized in the technical plan.";

/// Builds a templated pitch from the request and the architecture output.
///
/// The result always contains the literal idea, theme and team strength, so
/// it is usable even when every generated pitch was rejected.
#[must_use]
pub fn synthesize_pitch(
    request: &PipelineRequest,
    upstream_outputs: &[String],
    architecture_excerpt_chars: usize,
) -> String {
    let architecture = upstream_outputs
        .get(StageName::Architecture.index())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .map_or_else(
            || MISSING_ARCHITECTURE.to_string(),
            |text| truncate_chars(text, architecture_excerpt_chars),
        );

    let team = request.team_strength;
    let hours = request.duration_hours;
    let idea = request.idea.trim();
    let theme = request.theme.trim();

    format!(
        "# Pitch: {idea}\n\n\
         ## Hook\n\
         Within the theme \"{theme}\", one problem keeps coming up, and we built \
         something to solve it in {hours} hours.\n\n\
         ## Solution\n\
         {idea}. Our {team} team focused on what it does best to deliver a working MVP.\n\n\
         ## Live Demo\n\
         {architecture}\n\n\
         ## Reveal\n\
         Everything you just saw was designed, built and integrated by a {team} team in \
         {hours} hours.\n\n\
         ## Close\n\
         {idea} is ready for its next step within \"{theme}\". Thank you."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TeamStrength;

    fn request() -> PipelineRequest {
        PipelineRequest::new(
            "AI in Education",
            "Language learning app",
            TeamStrength::AiMl,
            9,
        )
    }

    #[test]
    fn test_contains_request_literals() {
        let upstream = vec![
            "research".to_string(),
            "critique".to_string(),
            "Use a FastAPI backend with a small LLM".to_string(),
        ];
        let pitch = synthesize_pitch(&request(), &upstream, 600);

        assert!(pitch.contains("Language learning app"));
        assert!(pitch.contains("AI in Education"));
        assert!(pitch.contains("AI/ML"));
        assert!(pitch.contains("9 hours"));
        assert!(pitch.contains("Use a FastAPI backend"));
        for section in ["## Hook", "## Solution", "## Live Demo", "## Reveal", "## Close"] {
            assert!(pitch.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_architecture_excerpt_is_bounded() {
        let upstream = vec![String::new(), String::new(), "a".repeat(2000)];
        let pitch = synthesize_pitch(&request(), &upstream, 600);
        assert!(pitch.contains(&format!("{}...", "a".repeat(600))));
        assert!(!pitch.contains(&"a".repeat(601)));
    }

    #[test]
    fn test_missing_architecture() {
        let pitch = synthesize_pitch(&request(), &[], 600);
        assert!(pitch.contains(MISSING_ARCHITECTURE));
    }

    #[test]
    fn test_deterministic() {
        let upstream = vec!["r".into(), "c".into(), "plan".into()];
        assert_eq!(
            synthesize_pitch(&request(), &upstream, 600),
            synthesize_pitch(&request(), &upstream, 600)
        );
    }
}
