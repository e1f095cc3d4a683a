//! Splits text extracted from a PDF into titled chapters with readable paragraphs.
//!
//! ```
//! let text = "Chapter 1\n\nIt began on a Tuesday. Nobody noticed the quiet. \
//!             The birds had gone.\n\nChapter 2: Aftermath\n\nBy Friday the town \
//!             was empty. Doors stood open. The wind did the rest.";
//! let chapters = chapterize::extract_chapters(text);
//! assert_eq!(chapters.len(), 2);
//! assert_eq!(chapters[1].title, "Aftermath");
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod services;

pub use config::{ChapterizerConfig, ConfigBuilder, ConfigError, ParagraphRhythm, ServerConfig};
pub use models::{Chapter, Extraction, Marker, Strategy};
pub use services::chapterizer::Chapterizer;

/// Chapterizes `raw_text` with default settings. Always returns at least one chapter.
pub fn extract_chapters(raw_text: &str) -> Vec<Chapter> {
    Chapterizer::default().extract(raw_text)
}
