//! Output normalization: locate, clean and score stage text.
//!
//! - [`OutputExtractor`] finds a usable string inside a raw result
//! - [`OutputCleaner`] strips fences and role prefixes
//! - [`QualityValidator`] scores the cleaned text with advisory heuristics

mod cleaner;
mod extractor;
mod quality;

pub use cleaner::{clean, OutputCleaner, DEFAULT_PREFIXES};
pub use extractor::{Extraction, ExtractionMethod, OutputExtractor};
pub use quality::{QualityCheck, QualityReport, QualityValidator};
