//! Sequential execution of the four strategy stages.

use super::fallback::synthesize_pitch;
use super::result::{
    FallbackReason, PipelineError, PipelineErrorKind, PipelineMetadata, PipelineResult,
    PipelineWarning,
};
use crate::config::StrategistConfig;
use crate::core::{PipelineState, StageName};
use crate::errors::{ExtractionError, GenerationError};
use crate::events::{EventSink, EventType, NoOpEventSink, PipelineEvent};
use crate::input::{PipelineRequest, ValidationWarning};
use crate::observability::SpanTimer;
use crate::output::{ExtractionMethod, OutputCleaner, OutputExtractor, QualityValidator};
use crate::stages::{
    DefaultPromptBuilder, StageExecutor, StageRequestBuilder, StageResult, TextGenerator,
};
use crate::utils::{generate_run_id, now_utc, trimmed_len, Timestamp};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Why a single stage did not produce a result.
#[derive(Debug)]
enum StageFailure {
    Generation(GenerationError),
    Extraction(ExtractionError),
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation(err) => write!(f, "{err}"),
            Self::Extraction(err) => write!(f, "{err}"),
        }
    }
}

impl StageFailure {
    fn into_error(self, stage: StageName, elapsed_seconds: f64) -> PipelineError {
        match self {
            Self::Generation(err) => PipelineError {
                kind: PipelineErrorKind::Generation(stage),
                message: err.to_string(),
                error_type: err.error_type().to_string(),
                elapsed_seconds,
            },
            Self::Extraction(err) => PipelineError {
                kind: PipelineErrorKind::Extraction(stage),
                message: err.to_string(),
                error_type: err.kind.to_string(),
                elapsed_seconds,
            },
        }
    }
}

/// Per-run mutable state. Lives on the stack of one `run` call.
struct RunState {
    run_id: Uuid,
    state: PipelineState,
    stage_results: Vec<StageResult>,
    upstream_outputs: Vec<String>,
    warnings: Vec<PipelineWarning>,
    metadata: PipelineMetadata,
}

/// Runs research, critique, architecture and pitch in order, threading each
/// stage's cleaned text into the next.
///
/// The orchestrator holds only immutable configuration and shared
/// collaborators, so one instance can serve concurrent runs.
pub struct PipelineOrchestrator {
    executor: StageExecutor,
    request_builder: Arc<dyn StageRequestBuilder>,
    event_sink: Arc<dyn EventSink>,
    extractor: OutputExtractor,
    cleaner: OutputCleaner,
    validator: QualityValidator,
    config: StrategistConfig,
}

impl fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("extractor", &self.extractor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PipelineOrchestrator {
    /// Creates an orchestrator with the default prompt builder and no event sink.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, config: StrategistConfig) -> Self {
        Self {
            executor: StageExecutor::new(generator),
            request_builder: Arc::new(DefaultPromptBuilder::new()),
            event_sink: Arc::new(NoOpEventSink),
            extractor: OutputExtractor::from_config(&config.extraction),
            cleaner: OutputCleaner::default(),
            validator: QualityValidator::default(),
            config,
        }
    }

    /// Replaces the prompt builder.
    #[must_use]
    pub fn with_request_builder(mut self, builder: Arc<dyn StageRequestBuilder>) -> Self {
        self.request_builder = builder;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Replaces the output cleaner.
    #[must_use]
    pub fn with_cleaner(mut self, cleaner: OutputCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Replaces the quality validator.
    #[must_use]
    pub fn with_validator(mut self, validator: QualityValidator) -> Self {
        self.validator = validator;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &StrategistConfig {
        &self.config
    }

    /// Normalizes the raw inputs and runs the pipeline.
    ///
    /// Never fails: fatal stage errors are reported inside the result.
    pub async fn run(
        &self,
        theme: &str,
        idea: &str,
        team_strength: &str,
        duration_hours: i64,
    ) -> PipelineResult {
        let (request, validation) = PipelineRequest::from_raw(theme, idea, team_strength, duration_hours);
        self.execute(request, validation).await
    }

    /// Runs the pipeline for an already-normalized request.
    pub async fn run_request(&self, request: PipelineRequest) -> PipelineResult {
        self.execute(request, Vec::new()).await
    }

    async fn execute(
        &self,
        request: PipelineRequest,
        validation: Vec<ValidationWarning>,
    ) -> PipelineResult {
        let run_id = generate_run_id();
        let span = tracing::info_span!(
            "pipeline",
            %run_id,
            team_strength = request.team_strength.label(),
            duration_hours = request.duration_hours,
        );
        self.execute_in_span(run_id, request, validation)
            .instrument(span)
            .await
    }

    async fn execute_in_span(
        &self,
        run_id: Uuid,
        request: PipelineRequest,
        validation: Vec<ValidationWarning>,
    ) -> PipelineResult {
        let started_at = now_utc();
        let timer = SpanTimer::start("pipeline");
        let mut run = RunState {
            run_id,
            state: PipelineState::default(),
            stage_results: Vec::with_capacity(StageName::ALL.len()),
            upstream_outputs: Vec::with_capacity(StageName::ALL.len()),
            warnings: Vec::new(),
            metadata: PipelineMetadata::default(),
        };

        for warning in validation {
            tracing::warn!(%warning, "Input corrected");
            run.warnings.push(warning.into());
        }

        tracing::info!(theme = %request.theme, idea = %request.idea, "Pipeline started");
        self.emit(
            PipelineEvent::new(EventType::PipelineStarted, run_id).with_data(json!({
                "theme": request.theme,
                "idea": request.idea,
                "team_strength": request.team_strength,
                "duration_hours": request.duration_hours,
            })),
        )
        .await;

        for stage in StageName::ALL {
            let stage_span = tracing::info_span!("stage", stage = stage.as_str());
            let outcome = self
                .execute_stage(stage, &request, &mut run)
                .instrument(stage_span)
                .await;

            if let Err(failure) = outcome {
                let error = failure.into_error(stage, timer.elapsed_seconds());
                return self.finish_failed(run, request, error, started_at, timer).await;
            }
        }

        let total_duration_seconds = timer.finish();
        tracing::info!(
            total_duration_seconds,
            pitch_is_fallback = run.metadata.pitch_is_fallback,
            warnings = run.warnings.len(),
            "Pipeline completed"
        );
        self.emit(
            PipelineEvent::new(EventType::PipelineCompleted, run_id).with_data(json!({
                "total_duration_seconds": total_duration_seconds,
                "pitch_is_fallback": run.metadata.pitch_is_fallback,
                "warnings": run.warnings.len(),
            })),
        )
        .await;

        PipelineResult {
            run_id,
            success: true,
            stage_results: run.stage_results,
            total_duration_seconds,
            error: None,
            warnings: run.warnings,
            metadata: run.metadata,
            request,
            final_state: run.state,
            started_at,
        }
    }

    /// Runs one stage and records its result in `run`.
    async fn execute_stage(
        &self,
        stage: StageName,
        request: &PipelineRequest,
        run: &mut RunState,
    ) -> Result<(), StageFailure> {
        let started_at = now_utc();
        let timer = SpanTimer::start(stage.as_str());
        self.emit(PipelineEvent::new(EventType::StageStarted, run.run_id).with_stage(stage))
            .await;
        tracing::info!("Stage started");

        let outcome = self
            .generate_stage(stage, request, &run.upstream_outputs, started_at, &timer)
            .await;

        let result = match outcome {
            Ok(result)
                if stage.is_final()
                    && trimmed_len(&result.cleaned_text) < self.config.pitch.min_length =>
            {
                let reason = FallbackReason::TooShort {
                    length: trimmed_len(&result.cleaned_text),
                    min_length: self.config.pitch.min_length,
                };
                self.fallback_result(request, run, reason, result.raw_char_length, started_at, &timer)
                    .await
            }
            Ok(result) => result,
            Err(StageFailure::Extraction(err)) if stage.is_final() => {
                let reason = FallbackReason::ExtractionFailed {
                    message: err.to_string(),
                };
                self.fallback_result(request, run, reason, 0, started_at, &timer)
                    .await
            }
            Err(StageFailure::Generation(err))
                if stage.is_final() && self.config.pitch.fallback_on_generation_error =>
            {
                let reason = FallbackReason::GenerationFailed {
                    message: err.to_string(),
                };
                self.fallback_result(request, run, reason, 0, started_at, &timer)
                    .await
            }
            Err(failure) => {
                tracing::error!(error = %failure, "Stage failed");
                self.emit(
                    PipelineEvent::new(EventType::StageFailed, run.run_id)
                        .with_stage(stage)
                        .with_data(json!({
                            "duration_seconds": timer.elapsed_seconds(),
                            "error": failure.to_string(),
                        })),
                )
                .await;
                return Err(failure);
            }
        };

        self.record(stage, result, run).await;
        Ok(())
    }

    /// Builds the request, calls the generator, then extracts, cleans and
    /// scores the text.
    async fn generate_stage(
        &self,
        stage: StageName,
        request: &PipelineRequest,
        upstream_outputs: &[String],
        started_at: Timestamp,
        timer: &SpanTimer,
    ) -> Result<StageResult, StageFailure> {
        let stage_request = self
            .request_builder
            .build_stage_request(stage, request, upstream_outputs);

        let raw = self
            .executor
            .execute(&stage_request)
            .await
            .map_err(StageFailure::Generation)?;

        let extraction = self.extractor.extract(&raw).map_err(StageFailure::Extraction)?;
        let cleaned_text = self.cleaner.clean(&extraction.text);
        if cleaned_text.is_empty() {
            return Err(StageFailure::Extraction(ExtractionError::empty_after_cleaning(
                extraction.method,
                self.extractor.preview(&raw),
            )));
        }

        let quality = self.validator.score(&cleaned_text, request.team_strength);
        Ok(StageResult {
            stage,
            raw_char_length: extraction.text.chars().count(),
            cleaned_text,
            extraction_method_used: extraction.method,
            quality_score: quality.score,
            quality,
            duration_seconds: timer.elapsed_seconds(),
            started_at,
            suspicious_extraction: extraction.suspicious,
        })
    }

    /// Replaces the final stage's output with synthesized content.
    async fn fallback_result(
        &self,
        request: &PipelineRequest,
        run: &mut RunState,
        reason: FallbackReason,
        raw_char_length: usize,
        started_at: Timestamp,
        timer: &SpanTimer,
    ) -> StageResult {
        tracing::warn!(%reason, "Using synthesized pitch");
        self.emit(
            PipelineEvent::new(EventType::StageFallback, run.run_id)
                .with_stage(StageName::Pitch)
                .with_data(json!({ "reason": reason })),
        )
        .await;

        let cleaned_text = synthesize_pitch(
            request,
            &run.upstream_outputs,
            self.config.pitch.architecture_excerpt_chars,
        );
        let quality = self.validator.score(&cleaned_text, request.team_strength);

        run.metadata.pitch_is_fallback = true;
        run.metadata.pitch_fallback_reason = Some(reason.clone());
        run.warnings.push(PipelineWarning::PitchFallback { reason });

        StageResult {
            stage: StageName::Pitch,
            raw_char_length,
            cleaned_text,
            extraction_method_used: ExtractionMethod::FallbackSynthesis,
            quality_score: quality.score,
            quality,
            duration_seconds: timer.elapsed_seconds(),
            started_at,
            suspicious_extraction: false,
        }
    }

    /// Appends a completed stage and raises its advisory warnings.
    async fn record(&self, stage: StageName, result: StageResult, run: &mut RunState) {
        if result.suspicious_extraction {
            let length = trimmed_len(&result.cleaned_text);
            tracing::warn!(method = %result.extraction_method_used, length, "Suspicious extraction");
            run.warnings.push(PipelineWarning::SuspiciousExtraction {
                stage,
                method: result.extraction_method_used,
                length,
            });
        }

        let threshold = self.config.quality.low_quality_threshold;
        if result.quality.is_below(threshold) {
            tracing::warn!(score = result.quality_score, threshold, "Low quality output");
            run.warnings.push(PipelineWarning::LowQuality {
                stage,
                score: result.quality_score,
                threshold,
            });
            self.emit(
                PipelineEvent::new(EventType::QualityLow, run.run_id)
                    .with_stage(stage)
                    .with_data(json!({
                        "score": result.quality_score,
                        "threshold": threshold,
                        "checks": result.quality.checks,
                    })),
            )
            .await;
        }

        tracing::info!(
            method = %result.extraction_method_used,
            raw_char_length = result.raw_char_length,
            quality_score = result.quality_score,
            duration_seconds = result.duration_seconds,
            "Stage completed"
        );
        self.emit(
            PipelineEvent::new(EventType::StageCompleted, run.run_id)
                .with_stage(stage)
                .with_data(json!({
                    "extraction_method": result.extraction_method_used,
                    "raw_char_length": result.raw_char_length,
                    "quality_score": result.quality_score,
                    "duration_seconds": result.duration_seconds,
                })),
        )
        .await;

        run.metadata
            .quality_scores
            .insert(stage.as_str().to_string(), result.quality_score);
        run.upstream_outputs.push(result.cleaned_text.clone());
        run.stage_results.push(result);
        run.state = run.state.advance();
    }

    async fn finish_failed(
        &self,
        mut run: RunState,
        request: PipelineRequest,
        error: PipelineError,
        started_at: Timestamp,
        timer: SpanTimer,
    ) -> PipelineResult {
        run.state = run.state.fail();
        let total_duration_seconds = timer.finish();
        tracing::error!(
            stage = error.kind.stage().as_str(),
            error_type = %error.error_type,
            elapsed_seconds = error.elapsed_seconds,
            completed_stages = run.stage_results.len(),
            "Pipeline failed: {}",
            error.message
        );
        self.emit(
            PipelineEvent::new(EventType::PipelineFailed, run.run_id)
                .with_stage(error.kind.stage())
                .with_data(json!({
                    "error": error,
                    "completed_stages": run.stage_results.len(),
                })),
        )
        .await;

        PipelineResult {
            run_id: run.run_id,
            success: false,
            stage_results: run.stage_results,
            total_duration_seconds,
            error: Some(error),
            warnings: run.warnings,
            metadata: run.metadata,
            request,
            final_state: run.state,
            started_at,
        }
    }

    async fn emit(&self, event: PipelineEvent) {
        self.event_sink.emit(&event).await;
    }
}
