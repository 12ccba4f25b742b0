//! Utility functions for run identifiers, timestamps and text handling.

mod ids;
pub mod text;

pub use ids::{generate_run_id, iso_timestamp, now_utc, Timestamp};
pub use text::{fold_key, trimmed_len, truncate_chars};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id_is_v4() {
        let id = generate_run_id();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }
}
