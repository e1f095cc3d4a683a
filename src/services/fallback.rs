//! Lower-confidence segmenters, used when too few chapter headings are found.

use crate::models::Chapter;
use crate::services::prose::ProseReconstructor;

/// First lines shorter than this that start with a chapter keyword become the title.
const MAX_PAGE_TITLE_CHARS: usize = 50;

/// Strategy A: splits on page breaks (a form feed, or `newline_run`+
/// newlines with only whitespace between them) and keeps segments longer
/// than `min_segment_chars`.
///
/// Expects heading-repaired text whose blank lines have not been collapsed yet.
pub fn split_page_breaks(
    text: &str,
    newline_run: usize,
    min_segment_chars: usize,
    prose: &ProseReconstructor,
) -> Vec<Chapter> {
    page_segments(text, newline_run)
        .into_iter()
        .map(str::trim)
        .filter(|segment| segment.chars().count() > min_segment_chars)
        .enumerate()
        .map(|(i, segment)| {
            let (title, body) = segment_title(segment, i + 1);
            Chapter::new(title, prose.reconstruct(body))
        })
        .collect()
}

/// Strategy B: the whole document as one chapter. Cannot fail.
pub fn whole_document(normalized: &str, prose: &ProseReconstructor) -> Chapter {
    Chapter::new("Chapter 1", prose.reconstruct(normalized))
}

fn page_segments(text: &str, newline_run: usize) -> Vec<&str> {
    let mut segments = Vec::new();

    for page in text.split('\x0C') {
        let mut segment_start = 0;
        let mut offset = 0;
        let mut blank_lines = 0;
        let mut gap_start = 0;

        for line in page.split_inclusive('\n') {
            if line.trim().is_empty() {
                if blank_lines == 0 {
                    gap_start = offset;
                }
                blank_lines += 1;
            } else {
                // n blank lines sit between n + 1 newlines.
                if blank_lines + 1 >= newline_run {
                    segments.push(&page[segment_start..gap_start]);
                    segment_start = offset;
                }
                blank_lines = 0;
            }
            offset += line.len();
        }
        segments.push(&page[segment_start..]);
    }

    segments
}

fn segment_title(segment: &str, index: usize) -> (String, &str) {
    let (first_line, rest) = segment.split_once('\n').unwrap_or((segment, ""));
    let first_line = first_line.trim();

    let is_heading = (first_line.starts_with("Chapter") || first_line.starts_with("CHAPTER"))
        && first_line.chars().count() < MAX_PAGE_TITLE_CHARS;

    if is_heading {
        (first_line.to_string(), rest)
    } else {
        (format!("Chapter {index}"), segment)
    }
}
