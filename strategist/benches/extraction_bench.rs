//! Benchmarks for extraction, cleaning and scoring.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use strategist::core::TeamStrength;
use strategist::output::{clean, OutputExtractor, QualityValidator};
use strategist::stages::{CrewOutput, RawStageResult, TaskOutput};

const PLAN: &str = "```markdown\nFinal Answer: ## MVP Core Feature\nRole-play chat with \
                    grammar feedback.\n## Tech Stack\nReact, FastAPI, hosted LLM API.\n\
                    ## Timeline\nHour 1-3 API, hour 4-7 UI, final 2 hours demo.\n```";

fn extraction_benchmark(c: &mut Criterion) {
    let extractor = OutputExtractor::default();
    let direct = RawStageResult::from(PLAN);
    let nested = RawStageResult::Crew(CrewOutput {
        tasks_output: vec![TaskOutput {
            output: Some(PLAN.to_string()),
            ..TaskOutput::default()
        }],
        ..CrewOutput::default()
    });
    let json = RawStageResult::Json(json!({"content": PLAN, "raw": ""}));

    c.bench_function("extract_raw", |b| b.iter(|| extractor.extract(black_box(&direct))));
    c.bench_function("extract_sub_result", |b| b.iter(|| extractor.extract(black_box(&nested))));
    c.bench_function("extract_string_conversion", |b| {
        b.iter(|| extractor.extract(black_box(&json)))
    });
}

fn cleaning_benchmark(c: &mut Criterion) {
    let validator = QualityValidator::default();
    c.bench_function("clean", |b| b.iter(|| clean(black_box(PLAN))));
    c.bench_function("clean_and_score", |b| {
        b.iter(|| validator.score(&clean(black_box(PLAN)), TeamStrength::AiMl))
    });
}

criterion_group!(benches, extraction_benchmark, cleaning_benchmark);
criterion_main!(benches);
