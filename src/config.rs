//! Engine tunables and server settings.

use anyhow::{Context, Result};
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Default configuration constants
pub mod defaults {
    /// Chapters whose trimmed content is not longer than this are dropped.
    pub const MIN_CHAPTER_CHARS: usize = 50;

    /// Page-break segments whose trimmed length is not longer than this are dropped.
    pub const MIN_PAGE_BREAK_SEGMENT_CHARS: usize = 100;

    /// Consecutive newlines that count as a page break.
    pub const PAGE_BREAK_NEWLINE_RUN: usize = 4;

    pub const MIN_SENTENCES_PER_PARAGRAPH: usize = 3;
    pub const MAX_SENTENCES_PER_PARAGRAPH: usize = 5;

    /// Sentence count used by the default fixed rhythm.
    pub const FIXED_SENTENCES_PER_PARAGRAPH: usize = 4;

    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 3000;
    pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sentences_per_paragraph must be a non-empty range starting above 0, got {start}..={end}")]
    SentenceRange { start: usize, end: usize },

    #[error("page_break_newline_run must be at least 2, got {0}")]
    PageBreakRun(usize),

    #[error("fixed paragraph size {size} lies outside sentences_per_paragraph {start}..={end}")]
    FixedOutOfRange {
        size: usize,
        start: usize,
        end: usize,
    },
}

/// How many sentences each reconstructed paragraph receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRhythm {
    /// Every paragraph closes after exactly this many sentences.
    Fixed(usize),
    /// Per-paragraph counts drawn uniformly from the sentence range by an RNG seeded here.
    Seeded(u64),
}

impl Default for ParagraphRhythm {
    fn default() -> Self {
        ParagraphRhythm::Fixed(defaults::FIXED_SENTENCES_PER_PARAGRAPH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterizerConfig {
    pub(crate) min_chapter_chars: usize,
    pub(crate) min_page_break_segment_chars: usize,
    pub(crate) page_break_newline_run: usize,
    pub(crate) sentences_per_paragraph: RangeInclusive<usize>,
    pub(crate) paragraph_rhythm: ParagraphRhythm,
    pub(crate) keep_front_matter: bool,
}

impl Default for ChapterizerConfig {
    fn default() -> Self {
        Self {
            min_chapter_chars: defaults::MIN_CHAPTER_CHARS,
            min_page_break_segment_chars: defaults::MIN_PAGE_BREAK_SEGMENT_CHARS,
            page_break_newline_run: defaults::PAGE_BREAK_NEWLINE_RUN,
            sentences_per_paragraph: defaults::MIN_SENTENCES_PER_PARAGRAPH
                ..=defaults::MAX_SENTENCES_PER_PARAGRAPH,
            paragraph_rhythm: ParagraphRhythm::default(),
            keep_front_matter: false,
        }
    }
}

impl ChapterizerConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn min_chapter_chars(&self) -> usize {
        self.min_chapter_chars
    }

    pub fn min_page_break_segment_chars(&self) -> usize {
        self.min_page_break_segment_chars
    }

    pub fn page_break_newline_run(&self) -> usize {
        self.page_break_newline_run
    }

    pub fn sentences_per_paragraph(&self) -> RangeInclusive<usize> {
        self.sentences_per_paragraph.clone()
    }

    pub fn paragraph_rhythm(&self) -> ParagraphRhythm {
        self.paragraph_rhythm
    }

    pub fn keep_front_matter(&self) -> bool {
        self.keep_front_matter
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let (start, end) = (
            *self.sentences_per_paragraph.start(),
            *self.sentences_per_paragraph.end(),
        );
        if start == 0 || start > end {
            return Err(ConfigError::SentenceRange { start, end });
        }

        if self.page_break_newline_run < 2 {
            return Err(ConfigError::PageBreakRun(self.page_break_newline_run));
        }

        if let ParagraphRhythm::Fixed(size) = self.paragraph_rhythm {
            if !self.sentences_per_paragraph.contains(&size) {
                return Err(ConfigError::FixedOutOfRange { size, start, end });
            }
        }

        Ok(())
    }
}

/// Fluent builder for [`ChapterizerConfig`]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    min_chapter_chars: Option<usize>,
    min_page_break_segment_chars: Option<usize>,
    page_break_newline_run: Option<usize>,
    sentences_per_paragraph: Option<RangeInclusive<usize>>,
    paragraph_rhythm: Option<ParagraphRhythm>,
    keep_front_matter: Option<bool>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_chapter_chars(mut self, chars: usize) -> Self {
        self.min_chapter_chars = Some(chars);
        self
    }

    pub fn min_page_break_segment_chars(mut self, chars: usize) -> Self {
        self.min_page_break_segment_chars = Some(chars);
        self
    }

    pub fn page_break_newline_run(mut self, newlines: usize) -> Self {
        self.page_break_newline_run = Some(newlines);
        self
    }

    /// Without an explicit rhythm, paragraphs get the range's midpoint as a fixed size.
    pub fn sentences_per_paragraph(mut self, range: RangeInclusive<usize>) -> Self {
        self.sentences_per_paragraph = Some(range);
        self
    }

    pub fn paragraph_rhythm(mut self, rhythm: ParagraphRhythm) -> Self {
        self.paragraph_rhythm = Some(rhythm);
        self
    }

    /// Emit text before the first heading as a "Prologue" chapter.
    pub fn keep_front_matter(mut self, keep: bool) -> Self {
        self.keep_front_matter = Some(keep);
        self
    }

    pub fn build(self) -> Result<ChapterizerConfig, ConfigError> {
        let mut config = ChapterizerConfig::default();

        if let Some(chars) = self.min_chapter_chars {
            config.min_chapter_chars = chars;
        }
        if let Some(chars) = self.min_page_break_segment_chars {
            config.min_page_break_segment_chars = chars;
        }
        if let Some(newlines) = self.page_break_newline_run {
            config.page_break_newline_run = newlines;
        }
        if let Some(range) = self.sentences_per_paragraph {
            config.paragraph_rhythm = ParagraphRhythm::Fixed((range.start() + range.end()) / 2);
            config.sentences_per_paragraph = range;
        }
        if let Some(rhythm) = self.paragraph_rhythm {
            config.paragraph_rhythm = rhythm;
        }
        if let Some(keep) = self.keep_front_matter {
            config.keep_front_matter = keep;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Settings for the HTTP wrapper, read from `CHAPTERIZE_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub engine: ChapterizerConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("CHAPTERIZE_HOST").unwrap_or_else(|| defaults::HOST.to_string());
        let port = parse_var(&lookup, "CHAPTERIZE_PORT")?.unwrap_or(defaults::PORT);
        let max_upload_bytes =
            parse_var(&lookup, "CHAPTERIZE_MAX_UPLOAD_BYTES")?.unwrap_or(defaults::MAX_UPLOAD_BYTES);

        let mut builder = ChapterizerConfig::builder();
        if let Some(chars) = parse_var(&lookup, "CHAPTERIZE_MIN_CHAPTER_CHARS")? {
            builder = builder.min_chapter_chars(chars);
        }
        if let Some(chars) = parse_var(&lookup, "CHAPTERIZE_MIN_SEGMENT_CHARS")? {
            builder = builder.min_page_break_segment_chars(chars);
        }
        if let Some(run) = parse_var(&lookup, "CHAPTERIZE_PAGE_BREAK_RUN")? {
            builder = builder.page_break_newline_run(run);
        }
        if let Some(raw) = lookup("CHAPTERIZE_SENTENCES_PER_PARAGRAPH") {
            builder = builder.sentences_per_paragraph(parse_range(&raw).with_context(|| {
                format!("CHAPTERIZE_SENTENCES_PER_PARAGRAPH has an invalid value: {raw:?}")
            })?);
        }
        if let Some(seed) = parse_var(&lookup, "CHAPTERIZE_PARAGRAPH_SEED")? {
            builder = builder.paragraph_rhythm(ParagraphRhythm::Seeded(seed));
        }
        let engine = builder.build().context("invalid chapterizer settings")?;

        Ok(ServerConfig {
            host,
            port,
            max_upload_bytes,
            engine,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accepts `4`, `3-5` or `3..=5`.
fn parse_range(raw: &str) -> Result<RangeInclusive<usize>> {
    let raw = raw.trim();
    let (start, end) = raw
        .split_once("..=")
        .or_else(|| raw.split_once('-'))
        .unwrap_or((raw, raw));
    Ok(start.trim().parse()?..=end.trim().parse()?)
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {raw:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ChapterizerConfig::default();
        assert_eq!(config.min_chapter_chars(), 50);
        assert_eq!(config.min_page_break_segment_chars(), 100);
        assert_eq!(config.page_break_newline_run(), 4);
        assert_eq!(config.sentences_per_paragraph(), 3..=5);
        assert_eq!(config.paragraph_rhythm(), ParagraphRhythm::Fixed(4));
        assert!(!config.keep_front_matter());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ChapterizerConfig::builder()
            .min_chapter_chars(10)
            .sentences_per_paragraph(2..=6)
            .paragraph_rhythm(ParagraphRhythm::Seeded(7))
            .keep_front_matter(true)
            .build()
            .unwrap();
        assert_eq!(config.min_chapter_chars(), 10);
        assert_eq!(config.sentences_per_paragraph(), 2..=6);
        assert_eq!(config.paragraph_rhythm(), ParagraphRhythm::Seeded(7));
        assert!(config.keep_front_matter());
    }

    #[test]
    fn test_range_alone_sets_fixed_size() {
        let config = ChapterizerConfig::builder()
            .sentences_per_paragraph(2..=3)
            .build()
            .unwrap();
        assert_eq!(config.sentences_per_paragraph(), 2..=3);
        assert_eq!(config.paragraph_rhythm(), ParagraphRhythm::Fixed(2));

        let config = ChapterizerConfig::builder()
            .sentences_per_paragraph(6..=8)
            .build()
            .unwrap();
        assert_eq!(config.paragraph_rhythm(), ParagraphRhythm::Fixed(7));
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert_eq!(
            ChapterizerConfig::builder()
                .sentences_per_paragraph(0..=3)
                .build(),
            Err(ConfigError::SentenceRange { start: 0, end: 3 })
        );
        assert_eq!(
            ChapterizerConfig::builder().page_break_newline_run(1).build(),
            Err(ConfigError::PageBreakRun(1))
        );
        assert_eq!(
            ChapterizerConfig::builder()
                .paragraph_rhythm(ParagraphRhythm::Fixed(9))
                .build(),
            Err(ConfigError::FixedOutOfRange {
                size: 9,
                start: 3,
                end: 5
            })
        );
    }

    #[test]
    fn test_server_config_from_lookup() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("CHAPTERIZE_PORT", "8088"),
            ("CHAPTERIZE_MIN_CHAPTER_CHARS", "20"),
            ("CHAPTERIZE_PARAGRAPH_SEED", "42"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8088");
        assert_eq!(config.max_upload_bytes, defaults::MAX_UPLOAD_BYTES);
        assert_eq!(config.engine.min_chapter_chars(), 20);
        assert_eq!(config.engine.paragraph_rhythm(), ParagraphRhythm::Seeded(42));
    }

    #[test]
    fn test_server_config_sentence_range() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("CHAPTERIZE_SENTENCES_PER_PARAGRAPH", "2-3")]))
                .unwrap();
        assert_eq!(config.engine.sentences_per_paragraph(), 2..=3);
        assert_eq!(config.engine.paragraph_rhythm(), ParagraphRhythm::Fixed(2));

        let config = ServerConfig::from_lookup(lookup_from(&[
            ("CHAPTERIZE_SENTENCES_PER_PARAGRAPH", "4..=6"),
            ("CHAPTERIZE_PARAGRAPH_SEED", "1"),
        ]))
        .unwrap();
        assert_eq!(config.engine.sentences_per_paragraph(), 4..=6);
        assert_eq!(config.engine.paragraph_rhythm(), ParagraphRhythm::Seeded(1));

        let config =
            ServerConfig::from_lookup(lookup_from(&[("CHAPTERIZE_SENTENCES_PER_PARAGRAPH", "6")]))
                .unwrap();
        assert_eq!(config.engine.sentences_per_paragraph(), 6..=6);

        let err =
            ServerConfig::from_lookup(lookup_from(&[("CHAPTERIZE_SENTENCES_PER_PARAGRAPH", "a-b")]))
                .unwrap_err();
        assert!(err.to_string().contains("CHAPTERIZE_SENTENCES_PER_PARAGRAPH"));
    }

    #[test]
    fn test_server_config_reports_bad_variable() {
        let err = ServerConfig::from_lookup(lookup_from(&[("CHAPTERIZE_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("CHAPTERIZE_PORT"));

        let err = ServerConfig::from_lookup(lookup_from(&[("CHAPTERIZE_PAGE_BREAK_RUN", "1")]))
            .unwrap_err();
        assert!(err.to_string().contains("invalid chapterizer settings"));
    }
}
