use crate::config::ChapterizerConfig;
use crate::models::{Chapter, Extraction, Strategy};
use crate::services::prose::ProseReconstructor;
use crate::services::{boundary, fallback, markers, normalizer};

const FRONT_MATTER_TITLE: &str = "Prologue";

/// Turns extracted document text into an ordered list of chapters.
///
/// Strategies run as a cascade and the first one producing at least two
/// chapters wins: chapter headings, then page breaks, then the whole
/// document as a single chapter. The result is never empty.
///
/// Holds no mutable state; one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Chapterizer {
    config: ChapterizerConfig,
    prose: ProseReconstructor,
}

impl Chapterizer {
    pub fn new(config: ChapterizerConfig) -> Self {
        let prose = ProseReconstructor::new(&config);
        Chapterizer { config, prose }
    }

    pub fn config(&self) -> &ChapterizerConfig {
        &self.config
    }

    pub fn extract(&self, raw_text: &str) -> Vec<Chapter> {
        self.extract_detailed(raw_text).chapters
    }

    /// Like [`Chapterizer::extract`], also reporting which strategy produced the chapters.
    pub fn extract_detailed(&self, raw_text: &str) -> Extraction {
        let span = tracing::info_span!("extract_chapters", input_bytes = raw_text.len());
        let _enter = span.enter();

        // Page-break splitting needs the blank-line runs that collapsing removes.
        let repaired = normalizer::repair_headings(raw_text);
        let normalized = normalizer::collapse_blank_lines(&repaired);

        let chapters = self.by_markers(&normalized);
        if chapters.len() >= 2 {
            return self.finish(chapters, Strategy::Markers);
        }
        tracing::debug!(
            found = chapters.len(),
            "too few heading chapters, trying page breaks"
        );

        let chapters = fallback::split_page_breaks(
            &repaired,
            self.config.page_break_newline_run,
            self.config.min_page_break_segment_chars,
            &self.prose,
        );
        if chapters.len() >= 2 {
            return self.finish(chapters, Strategy::PageBreaks);
        }
        tracing::debug!(
            found = chapters.len(),
            "too few page-break segments, using whole document"
        );

        let chapter = fallback::whole_document(&normalized, &self.prose);
        self.finish(vec![chapter], Strategy::WholeDocument)
    }

    fn by_markers(&self, normalized: &str) -> Vec<Chapter> {
        let markers = markers::find_markers(normalized);
        if markers.is_empty() {
            return Vec::new();
        }

        let min_chars = self.config.min_chapter_chars;
        let mut chapters: Vec<Chapter> = boundary::split(normalized, &markers, min_chars)
            .into_iter()
            .map(|raw| Chapter::new(raw.title, self.prose.reconstruct(&raw.content)))
            .collect();

        if self.config.keep_front_matter {
            if let Some(preface) = boundary::front_matter(normalized, &markers, min_chars) {
                chapters.insert(
                    0,
                    Chapter::new(FRONT_MATTER_TITLE, self.prose.reconstruct(preface)),
                );
            }
        }

        chapters
    }

    fn finish(&self, chapters: Vec<Chapter>, strategy: Strategy) -> Extraction {
        tracing::debug!(?strategy, chapters = chapters.len(), "chapterization finished");
        Extraction { chapters, strategy }
    }
}
