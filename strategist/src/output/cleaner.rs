//! Removal of formatting artifacts from extracted text.

use regex::Regex;
use std::sync::OnceLock;

/// Leading labels stripped from generated text, in priority order.
pub const DEFAULT_PREFIXES: &[&str] = &[
    "Agent Final Answer:",
    "Final Answer:",
    "Final Output:",
    "Agent:",
    "Output:",
    "Answer:",
    "Result:",
    "Response:",
];

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)\A(```|~~~)[A-Za-z0-9_+\-]*[ \t]*\r?\n?(.*?)\r?\n?[ \t]*(```|~~~)\z")
            .unwrap_or_else(|e| unreachable!("fence pattern is valid: {e}"))
    })
}

/// Strips code fences and role prefixes from text.
///
/// A single pass removes at most one enclosing fence and at most one
/// prefix, then trims. Passes repeat until the text stops changing, so
/// `clean(clean(x)) == clean(x)`.
#[derive(Debug, Clone)]
pub struct OutputCleaner {
    prefixes: Vec<String>,
}

impl Default for OutputCleaner {
    fn default() -> Self {
        Self::with_prefixes(DEFAULT_PREFIXES.iter().copied())
    }
}

impl OutputCleaner {
    /// Creates a cleaner with the default prefix list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cleaner with a custom prefix list, checked in order.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Cleans `text`. Never fails; returns the trimmed input when there is
    /// nothing to strip.
    ///
    /// Because passes repeat to a fixed point, chained labels are all
    /// removed: `"Output: Answer: text"` becomes `"text"`, as does a label
    /// left exposed once a fence is unwrapped.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let mut current = text.trim().to_string();
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(&self, text: &str) -> String {
        let unfenced = strip_fence(text).unwrap_or(text).trim();
        self.strip_prefix(unfenced).trim().to_string()
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> &'a str {
        for prefix in &self.prefixes {
            let Some(head) = text.get(..prefix.len()) else {
                continue;
            };
            if head.eq_ignore_ascii_case(prefix) {
                return &text[prefix.len()..];
            }
        }
        text
    }
}

/// Returns the body of a text wrapped in one fence of a single marker kind.
fn strip_fence(text: &str) -> Option<&str> {
    let caps = fence_regex().captures(text)?;
    let open = caps.get(1)?.as_str();
    let close = caps.get(3)?.as_str();
    let body = caps.get(2)?.as_str();

    // Several fenced blocks side by side are content, not a wrapper.
    if open != close || body.contains(open) {
        return None;
    }
    Some(body)
}

/// Cleans `text` with the default prefix list.
#[must_use]
pub fn clean(text: &str) -> String {
    OutputCleaner::default().clean(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_fence_with_language_tag() {
        assert_eq!(clean("```markdown\n# Pitch\nHook here\n```"), "# Pitch\nHook here");
        assert_eq!(clean("~~~\nbody\n~~~"), "body");
    }

    #[test]
    fn test_mismatched_fence_markers_kept() {
        let text = "```\nbody\n~~~";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_multiple_blocks_not_unwrapped() {
        let text = "```rust\nfn a() {}\n```\nthen\n```rust\nfn b() {}\n```";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_strips_prefix_case_insensitively() {
        assert_eq!(clean("final answer: The plan"), "The plan");
        assert_eq!(clean("OUTPUT:   The plan"), "The plan");
        assert_eq!(clean("Agent Final Answer: The plan"), "The plan");
    }

    #[test]
    fn test_prefix_only_at_start() {
        assert_eq!(clean("The Output: stays"), "The Output: stays");
    }

    #[test]
    fn test_fence_then_prefix() {
        assert_eq!(clean("```\nFinal Answer: ship it\n```"), "ship it");
    }

    #[test]
    fn test_chained_prefixes_all_removed() {
        assert_eq!(clean("Output: Answer: text"), "text");
        assert_eq!(clean("Final Answer: result: done"), "done");
        assert_eq!(clean("Response: ```\nAgent: ship it\n```"), "ship it");
    }

    #[test]
    fn test_noop_returns_trimmed_input() {
        assert_eq!(clean("  already clean \n"), "already clean");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_non_ascii_prefix_window() {
        // Byte length of the prefix lands inside a multi-byte char.
        assert_eq!(clean("ééééééééééé plan"), "ééééééééééé plan");
    }

    #[test]
    fn test_custom_prefixes() {
        let cleaner = OutputCleaner::with_prefixes(["Thought:"]);
        assert_eq!(cleaner.clean("Thought: go"), "go");
        assert_eq!(cleaner.clean("Output: go"), "Output: go");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "```\nOutput: ```a long inner text```\n```",
            "Output: Answer: text",
            "```md\n```md\nnested\n```\n```",
            "Final Answer:",
            "   ~~~\n\n~~~   ",
            "Result: ```\nResponse: x\n```",
            "plain",
            "",
            "```\n   \n```",
            "```\n\t\n```",
            "``````",
            "```````",
            "```\r\nbody\r\n```",
            "```md\r\nOutput: body\r\n```\r\n",
            "Output: ```\nbody\n```",
            "Final Answer: ~~~\nResult: ```\nx\n```\n~~~",
            "Answer:```",
            "```\nAnswer:\n```",
            "é```\nbody\n```",
            "Output:Output:Output:",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "sample {sample:?}");
        }
    }
}
