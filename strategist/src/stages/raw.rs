//! Raw results returned by a text-generation backend.
//!
//! Backends do not agree on a result shape. Each shape is a variant here
//! with explicit accessors, so extraction never probes attributes at
//! runtime: an absent field is simply `None`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Finish reasons that mean the backend gave up on its iteration/time budget.
const BUDGET_FINISH_REASONS: &[&str] = &["iteration_limit", "time_limit", "max_iterations"];

/// Text agent frameworks emit in place of an answer when they hit the budget.
pub const BUDGET_SENTINEL: &str = "Agent stopped due to iteration limit or time limit.";

/// Output of a single task/agent invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Primary text of the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Secondary "output" field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Secondary "result" field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Why generation stopped, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl TaskOutput {
    /// Creates a task output with only the primary text set.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Reads the known string fields out of a JSON object.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            raw: field("raw"),
            output: field("output"),
            result: field("result"),
            finish_reason: field("finish_reason"),
        }
    }

    fn render(&self) -> String {
        join_fields([&self.raw, &self.output, &self.result])
    }
}

/// Output of a multi-task run: its own fields plus one entry per sub-task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Primary text of the combined result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Secondary "output" field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Secondary "result" field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Per-task results, in execution order.
    #[serde(default)]
    pub tasks_output: Vec<TaskOutput>,
}

/// A raw result of unknown shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawStageResult {
    /// The backend returned nothing.
    #[default]
    Empty,
    /// A plain string.
    Text(String),
    /// A single wrapped result.
    Task(TaskOutput),
    /// A wrapped result with a collection of sub-results.
    Crew(CrewOutput),
    /// An arbitrary JSON document.
    Json(serde_json::Value),
}

impl RawStageResult {
    /// The named primary text field (`raw`), or the string itself.
    #[must_use]
    pub fn primary_text(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Text(text) => Some(text),
            Self::Task(task) => task.raw.as_deref(),
            Self::Crew(crew) => crew.raw.as_deref(),
            Self::Json(value) => json_str(value, "raw"),
        }
    }

    /// The named `output` field.
    #[must_use]
    pub fn output_field(&self) -> Option<&str> {
        match self {
            Self::Empty | Self::Text(_) => None,
            Self::Task(task) => task.output.as_deref(),
            Self::Crew(crew) => crew.output.as_deref(),
            Self::Json(value) => json_str(value, "output"),
        }
    }

    /// The named `result` field.
    #[must_use]
    pub fn result_field(&self) -> Option<&str> {
        match self {
            Self::Empty | Self::Text(_) => None,
            Self::Task(task) => task.result.as_deref(),
            Self::Crew(crew) => crew.result.as_deref(),
            Self::Json(value) => json_str(value, "result"),
        }
    }

    /// The first element of the sub-results collection, if any.
    #[must_use]
    pub fn first_sub_result(&self) -> Option<Cow<'_, TaskOutput>> {
        match self {
            Self::Crew(crew) => crew.tasks_output.first().map(Cow::Borrowed),
            Self::Json(value) => value
                .get("tasks_output")
                .and_then(|v| v.as_array())
                .and_then(|items| items.first())
                .map(|first| Cow::Owned(TaskOutput::from_json(first))),
            _ => None,
        }
    }

    /// The finish reason reported by the backend.
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        match self {
            Self::Task(task) => task.finish_reason.as_deref(),
            Self::Json(value) => json_str(value, "finish_reason"),
            _ => None,
        }
    }

    /// Unconditional string form of the whole result.
    ///
    /// Empty when the result carries no non-blank content anywhere.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Task(task) => task.render(),
            Self::Crew(crew) => {
                let own = join_fields([&crew.raw, &crew.output, &crew.result]);
                if own.is_empty() {
                    crew.tasks_output
                        .iter()
                        .map(TaskOutput::render)
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n\n")
                } else {
                    own
                }
            }
            Self::Json(serde_json::Value::String(text)) => text.clone(),
            Self::Json(value) if has_content(value) => value.to_string(),
            Self::Json(_) => String::new(),
        }
    }

    /// Returns true when the backend stopped on its iteration/time budget
    /// instead of producing an answer.
    #[must_use]
    pub fn is_budget_exhausted(&self) -> bool {
        let by_reason = self
            .finish_reason()
            .is_some_and(|reason| BUDGET_FINISH_REASONS.contains(&reason));
        let by_sentinel = self
            .primary_text()
            .is_some_and(|text| text.trim().starts_with(BUDGET_SENTINEL));
        by_reason || by_sentinel
    }
}

impl From<String> for RawStageResult {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawStageResult {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<TaskOutput> for RawStageResult {
    fn from(task: TaskOutput) -> Self {
        Self::Task(task)
    }
}

impl From<CrewOutput> for RawStageResult {
    fn from(crew: CrewOutput) -> Self {
        Self::Crew(crew)
    }
}

impl From<serde_json::Value> for RawStageResult {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

fn json_str<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(|v| v.as_str())
}

fn has_content(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) => true,
        serde_json::Value::Array(items) => items.iter().any(has_content),
        serde_json::Value::Object(map) => map.values().any(has_content),
    }
}

fn join_fields<const N: usize>(fields: [&Option<String>; N]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(N);
    for field in fields.into_iter().flatten() {
        let trimmed = field.trim();
        if !trimmed.is_empty() && !parts.contains(&trimmed) {
            parts.push(trimmed);
        }
    }
    parts.join("\n\n")
}
