//! Pipeline input: the normalized request and the normalizer that produces it.

mod normalizer;
mod request;

pub use normalizer::{
    normalize, normalize_duration, normalize_team_strength, NormalizedInput, ValidationWarning,
    DEFAULT_DURATION_HOURS, MAX_DURATION_HOURS, MIN_DURATION_HOURS,
};
pub use request::PipelineRequest;
