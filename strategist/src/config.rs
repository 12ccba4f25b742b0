//! Configuration for the strategist pipeline.
//!
//! Every field has a default, so a partial JSON file or an empty
//! environment still yields a complete [`StrategistConfig`].

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable overriding the API base URL.
pub const ENV_API_BASE: &str = "STRATEGIST_API_BASE";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "STRATEGIST_API_KEY";
/// Fallback environment variable for the API key.
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
/// Environment variable overriding the model name.
pub const ENV_MODEL: &str = "STRATEGIST_MODEL";
/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECONDS: &str = "STRATEGIST_TIMEOUT_SECONDS";
/// Environment variable overriding the extraction length threshold.
pub const ENV_EXTRACT_MIN_LENGTH: &str = "STRATEGIST_EXTRACT_MIN_LENGTH";
/// Environment variable overriding the pitch length threshold.
pub const ENV_PITCH_MIN_LENGTH: &str = "STRATEGIST_PITCH_MIN_LENGTH";
/// Environment variable overriding the low-quality threshold.
pub const ENV_LOW_QUALITY_THRESHOLD: &str = "STRATEGIST_LOW_QUALITY_THRESHOLD";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategistConfig {
    /// Output extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Pitch stage settings.
    #[serde(default)]
    pub pitch: PitchConfig,
    /// Quality scoring settings.
    #[serde(default)]
    pub quality: QualityConfig,
    /// HTTP backend settings.
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl StrategistConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Loads a JSON configuration file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: display,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.quality.validate()
    }

    /// Applies environment-style overrides on top of the current values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut next = self.clone();

        if let Some(api_base) = present(ENV_API_BASE) {
            next.generation.api_base = api_base.trim().trim_end_matches('/').to_string();
        }
        if let Some(api_key) = present(ENV_API_KEY).or_else(|| present(ENV_GROQ_API_KEY)) {
            next.generation.api_key = Some(api_key.trim().to_string());
        }
        if let Some(model) = present(ENV_MODEL) {
            next.generation.model = model.trim().to_string();
        }
        if let Some(raw) = present(ENV_TIMEOUT_SECONDS) {
            next.generation.timeout_seconds = parse_var(ENV_TIMEOUT_SECONDS, &raw)?;
        }
        if let Some(raw) = present(ENV_EXTRACT_MIN_LENGTH) {
            next.extraction.min_length = parse_var(ENV_EXTRACT_MIN_LENGTH, &raw)?;
        }
        if let Some(raw) = present(ENV_PITCH_MIN_LENGTH) {
            next.pitch.min_length = parse_var(ENV_PITCH_MIN_LENGTH, &raw)?;
        }
        if let Some(raw) = present(ENV_LOW_QUALITY_THRESHOLD) {
            next.quality.low_quality_threshold = parse_var(ENV_LOW_QUALITY_THRESHOLD, &raw)?;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid_value(key, raw, e.to_string()))
}

/// Settings for locating text in raw results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Trimmed text must be longer than this to qualify.
    #[serde(default = "default_extract_min_length")]
    pub min_length: usize,
    /// Characters of the raw result kept in error previews.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_extract_min_length() -> usize {
    20
}

fn default_preview_chars() -> usize {
    200
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_length: default_extract_min_length(),
            preview_chars: default_preview_chars(),
        }
    }
}

/// Settings for the final stage and its fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchConfig {
    /// Cleaned pitch text shorter than this triggers fallback synthesis.
    #[serde(default = "default_pitch_min_length")]
    pub min_length: usize,
    /// Synthesize a pitch when generation itself fails.
    #[serde(default = "default_true")]
    pub fallback_on_generation_error: bool,
    /// Characters of architecture output embedded in a synthesized pitch.
    #[serde(default = "default_architecture_excerpt")]
    pub architecture_excerpt_chars: usize,
}

fn default_pitch_min_length() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_architecture_excerpt() -> usize {
    600
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            min_length: default_pitch_min_length(),
            fallback_on_generation_error: default_true(),
            architecture_excerpt_chars: default_architecture_excerpt(),
        }
    }
}

/// Settings for quality scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Scores below this produce a low-quality warning.
    #[serde(default = "default_low_quality_threshold")]
    pub low_quality_threshold: f64,
}

fn default_low_quality_threshold() -> f64 {
    0.5
}

impl QualityConfig {
    /// Rejects thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.low_quality_threshold) {
            Ok(())
        } else {
            Err(ConfigError::invalid_value(
                "quality.low_quality_threshold",
                self.low_quality_threshold.to_string(),
                "must be within [0, 1]",
            ))
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            low_quality_threshold: default_low_quality_threshold(),
        }
    }
}

/// Settings for the OpenAI-compatible HTTP backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL, without the `/chat/completions` suffix.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion token cap.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> f64 {
    120.0
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl GenerationConfig {
    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Gets timeout as Duration.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        let invalid = |reason: &str| {
            ConfigError::invalid_value(
                "generation.timeout_seconds",
                self.timeout_seconds.to_string(),
                reason,
            )
        };
        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(invalid("must be a positive number of seconds"));
        }
        Duration::try_from_secs_f64(self.timeout_seconds).map_err(|e| invalid(&e.to_string()))
    }

    /// Rejects timeouts that cannot become a [`Duration`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timeout().map(|_| ())
    }

    /// Full URL of the chat completions endpoint.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StrategistConfig::default();
        assert_eq!(config.extraction.min_length, 20);
        assert_eq!(config.extraction.preview_chars, 200);
        assert_eq!(config.pitch.min_length, 50);
        assert!(config.pitch.fallback_on_generation_error);
        assert_eq!(config.pitch.architecture_excerpt_chars, 600);
        assert!((config.quality.low_quality_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.generation.model, "llama3-8b-8192");
        assert_eq!(
            config.generation.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(config.generation.timeout().unwrap(), Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = StrategistConfig::from_lookup(lookup(&[
            (ENV_API_BASE, "http://localhost:8080/v1/"),
            (ENV_MODEL, "mixtral"),
            (ENV_TIMEOUT_SECONDS, "30"),
            (ENV_EXTRACT_MIN_LENGTH, "10"),
            (ENV_PITCH_MIN_LENGTH, " 80 "),
            (ENV_LOW_QUALITY_THRESHOLD, "0.75"),
        ]))
        .unwrap();

        assert_eq!(config.generation.api_base, "http://localhost:8080/v1");
        assert_eq!(config.generation.model, "mixtral");
        assert!((config.generation.timeout_seconds - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.extraction.min_length, 10);
        assert_eq!(config.pitch.min_length, 80);
        assert!((config.quality.low_quality_threshold - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_api_key_fallback() {
        let config = StrategistConfig::from_lookup(lookup(&[(ENV_GROQ_API_KEY, "gsk-1")])).unwrap();
        assert_eq!(config.generation.api_key.as_deref(), Some("gsk-1"));

        let config = StrategistConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "primary"),
            (ENV_GROQ_API_KEY, "gsk-1"),
        ]))
        .unwrap();
        assert_eq!(config.generation.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_blank_values_ignored() {
        let config = StrategistConfig::from_lookup(lookup(&[(ENV_MODEL, "  ")])).unwrap();
        assert_eq!(config.generation.model, default_model());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = StrategistConfig::from_lookup(lookup(&[(ENV_PITCH_MIN_LENGTH, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_PITCH_MIN_LENGTH));

        let err = StrategistConfig::from_lookup(lookup(&[(ENV_LOW_QUALITY_THRESHOLD, "1.5")])).unwrap_err();
        assert!(err.to_string().contains("[0, 1]"));

        let err = StrategistConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECONDS, "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pitch": {{"min_length": 120}}, "generation": {{"model": "m"}}}}"#).unwrap();

        let config = StrategistConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.pitch.min_length, 120);
        assert!(config.pitch.fallback_on_generation_error);
        assert_eq!(config.generation.model, "m");
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = StrategistConfig::from_json_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        let err = StrategistConfig::from_json_file(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_json_file_out_of_range_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            (r#"{"generation": {"timeout_seconds": 1e30}}"#, "generation.timeout_seconds"),
            (r#"{"generation": {"timeout_seconds": 0}}"#, "generation.timeout_seconds"),
            (r#"{"quality": {"low_quality_threshold": 7.0}}"#, "quality.low_quality_threshold"),
        ];

        for (i, (contents, field)) in cases.iter().enumerate() {
            let path = dir.path().join(format!("config-{i}.json"));
            std::fs::write(&path, contents).unwrap();
            let err = StrategistConfig::from_json_file(&path).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref key, .. } if key == field),
                "{contents}: {err}"
            );
        }
    }

    #[test]
    fn test_huge_timeout_is_an_error_not_a_panic() {
        let config = GenerationConfig::default().with_timeout(1e30);
        assert!(matches!(config.timeout(), Err(ConfigError::InvalidValue { .. })));
        assert!(GenerationConfig::default().with_timeout(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejected_overrides_leave_config_untouched() {
        let mut config = StrategistConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_MODEL, "mixtral"), (ENV_TIMEOUT_SECONDS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(config, StrategistConfig::default());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = StrategistConfig {
            generation: GenerationConfig::default().with_api_key("secret"),
            ..StrategistConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
