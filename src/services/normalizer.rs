//! First pipeline stage: heading repair and blank-line collapsing.

use once_cell::sync::Lazy;
use regex::Regex;

// Heading keywords split by a stray space or line break during extraction.
static SPLIT_CHAPTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(c)\s+(hapter)\b").unwrap());
static SPLIT_CHAPT_ER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(chapt)\s+(er)\b").unwrap());

// Two or more newlines; whitespace-only lines count as blank.
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());

/// Repairs split heading keywords, then collapses blank-line runs.
pub fn normalize(raw: &str) -> String {
    collapse_blank_lines(&repair_headings(raw))
}

/// `C hapter` → `Chapter`, `CHAPT ER` → `CHAPTER`, keeping the original letter case.
pub fn repair_headings(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = SPLIT_CHAPTER.replace_all(&text, "$1$2");
    SPLIT_CHAPT_ER.replace_all(&text, "$1$2").into_owned()
}

/// Turns form feeds into blank lines and any run of 3+ newlines into exactly 2.
/// Whitespace-only blank lines are emptied; single newlines are left alone.
pub fn collapse_blank_lines(text: &str) -> String {
    let text = text.replace('\x0C', "\n\n");
    BLANK_RUN.replace_all(&text, "\n\n").into_owned()
}
