//! Small text helpers shared by the normalizer, extractor and fallback.

/// Returns at most `max_chars` characters of `text`, appending an ellipsis
/// when anything was cut. Always splits on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Number of characters after trimming surrounding whitespace.
#[must_use]
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Folds a free-form label for alias lookup: lowercase, with whitespace,
/// hyphens, underscores, slashes and dots removed.
#[must_use]
pub fn fold_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_' | '/' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_cuts_on_char_boundary() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll...");
    }

    #[test]
    fn test_trimmed_len() {
        assert_eq!(trimmed_len("  abc \n"), 3);
        assert_eq!(trimmed_len("   "), 0);
    }

    #[test]
    fn test_fold_key() {
        assert_eq!(fold_key(" Full Stack "), "fullstack");
        assert_eq!(fold_key("AI/ML"), "aiml");
        assert_eq!(fold_key("Front-End"), "frontend");
        assert_eq!(fold_key("full_stack"), "fullstack");
    }
}
