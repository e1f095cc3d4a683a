//! Re-flows extracted text into paragraphs of a few sentences each.
//!
//! PDF extraction wraps lines wherever the page did, so every newline inside
//! a chapter is treated as noise: the text is flattened to one line, cut at
//! sentence boundaries, and paragraphs are rebuilt from the sentences.
//!
//! Sentence detection is a plain pattern (terminator, optional closing quote,
//! whitespace, capital letter). It misfires on abbreviations ("Dr. Watson"),
//! initials and similar; that is accepted.

use crate::config::{ChapterizerConfig, ParagraphRhythm};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::ops::RangeInclusive;

static HYPHEN_WRAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{Ll})-[ \t]*\n[ \t]*(\p{Ll})").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static TERMINATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[.!?]["'”’]?\s+"#).unwrap());

#[derive(Debug, Clone)]
pub struct ProseReconstructor {
    sentences_per_paragraph: RangeInclusive<usize>,
    rhythm: ParagraphRhythm,
}

impl Default for ProseReconstructor {
    fn default() -> Self {
        Self::new(&ChapterizerConfig::default())
    }
}

impl ProseReconstructor {
    pub fn new(config: &ChapterizerConfig) -> Self {
        ProseReconstructor {
            sentences_per_paragraph: config.sentences_per_paragraph(),
            rhythm: config.paragraph_rhythm(),
        }
    }

    /// Returns paragraphs separated by a blank line. Whitespace-only input yields `""`.
    pub fn reconstruct(&self, raw: &str) -> String {
        let flowed = flatten(raw);
        let sentences = split_sentences(&flowed);

        let mut sizer = self.sizer();
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut target = sizer.next_size();

        for sentence in sentences {
            current.push(sentence);
            if current.len() >= target {
                paragraphs.push(current.join(" "));
                current.clear();
                target = sizer.next_size();
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        paragraphs.retain(|p| !p.trim().is_empty());
        paragraphs.join("\n\n")
    }

    fn sizer(&self) -> ParagraphSizer {
        match self.rhythm {
            ParagraphRhythm::Fixed(size) => ParagraphSizer::Fixed(size.max(1)),
            ParagraphRhythm::Seeded(seed) => ParagraphSizer::Seeded {
                rng: StdRng::seed_from_u64(seed),
                range: self.sentences_per_paragraph.clone(),
            },
        }
    }
}

enum ParagraphSizer {
    Fixed(usize),
    Seeded {
        rng: StdRng,
        range: RangeInclusive<usize>,
    },
}

impl ParagraphSizer {
    fn next_size(&mut self) -> usize {
        match self {
            ParagraphSizer::Fixed(size) => *size,
            ParagraphSizer::Seeded { rng, range } => rng.random_range(range.clone()).max(1),
        }
    }
}

/// Rejoins words hyphenated across a wrap, then folds every newline and
/// whitespace run into a single space.
fn flatten(raw: &str) -> String {
    let joined = HYPHEN_WRAP.replace_all(raw, "$1$2");
    WHITESPACE.replace_all(joined.trim(), " ").into_owned()
}

/// Cuts flattened text into sentences, each keeping its terminator.
/// One forward pass; the capital-letter check looks at a single character.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for m in TERMINATOR.find_iter(text) {
        let starts_sentence = text[m.end()..]
            .chars()
            .next()
            .is_some_and(char::is_uppercase);
        if !starts_sentence {
            continue;
        }
        let sentence = text[last..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last = m.end();
    }

    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}
