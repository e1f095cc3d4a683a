//! Chapter heading detection and title cleanup.

use crate::models::Marker;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// `Chapter|CHAPTER|Ch.` + designator at the start of the text or right after a blank line
// (whitespace-only lines count as blank).
// Longer number words come before their prefixes ("seventeen" before "seven").
static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\A|\n[ \t]*\n)[ \t]*(?P<heading>(?P<prefix>(?:Chapter|CHAPTER|Ch\.)[ \t]+(?P<designator>\d+|(?i:twenty|nineteen|eighteen|seventeen|sixteen|fifteen|fourteen|thirteen|twelve|eleven|ten|nine|eight|seven|six|five|four|three|two|one)|[IVXLCDM]+)\b)(?P<rest>[^\n]*))",
    )
    .unwrap()
});

// A 1-5 word title-case phrase followed by what reads as a new sentence:
// a capitalized word, then a lowercase one.
static SHORT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<title>\p{Lu}[\p{L}\p{N}'’-]*(?:[ \t]+\p{Lu}[\p{L}\p{N}'’-]*){0,4})[ \t]+\p{Lu}[\p{L}'’-]*[ \t]+\p{Ll}",
    )
    .unwrap()
});

const SEPARATORS: [char; 5] = [':', '-', '—', '–', '.'];

/// Finds chapter headings in normalized text, in document order.
///
/// An empty result is not an error: it tells the caller to try the fallback segmenters.
pub fn find_markers(normalized: &str) -> Vec<Marker> {
    let markers: Vec<Marker> = HEADING
        .captures_iter(normalized)
        .filter_map(|caps| build_marker(&caps))
        .collect();

    for marker in &markers {
        tracing::trace!(
            offset = marker.start_offset,
            heading = %marker.raw_heading,
            title = %marker.title,
            "chapter marker"
        );
    }
    tracing::debug!(count = markers.len(), "marker detection finished");

    markers
}

fn build_marker(caps: &Captures<'_>) -> Option<Marker> {
    let heading = caps.name("heading")?;
    let prefix = caps.name("prefix")?.as_str();
    let designator = caps.name("designator")?.as_str();
    let rest = caps.name("rest").map_or("", |m| m.as_str());

    let (title, clean_heading) = match split_subtitle(rest) {
        Some((separator_part, subtitle)) => {
            let title = clean_title(subtitle).to_string();
            let clean = format!("{prefix}{separator_part} {title}");
            (title, clean)
        }
        None => {
            let title = format!("Chapter {designator}");
            (title.clone(), title)
        }
    };

    Some(Marker {
        raw_heading: prefix.to_string(),
        start_offset: heading.start(),
        matched_text: heading.as_str().trim_end().to_string(),
        title,
        clean_heading,
    })
}

/// Splits the text after the designator into the separator (with any spacing
/// before it) and the subtitle. `None` when there is no subtitle.
fn split_subtitle(rest: &str) -> Option<(&str, &str)> {
    let after_space = rest.trim_start_matches([' ', '\t']);
    let (separator_part, subtitle) = match after_space.chars().next() {
        Some(c) if SEPARATORS.contains(&c) => {
            let sep_end = rest.len() - after_space.len() + c.len_utf8();
            (&rest[..sep_end], &rest[sep_end..])
        }
        _ => ("", rest),
    };

    // Leftover punctuation ("Chapter 1 ***") is not a subtitle.
    let subtitle = subtitle.trim();
    if !subtitle.chars().any(char::is_alphanumeric) {
        None
    } else {
        Some((separator_part, subtitle))
    }
}

/// Cuts run-on body text off a subtitle when a short title-case phrase is
/// followed by something that looks like the first sentence of the chapter.
fn clean_title(subtitle: &str) -> &str {
    SHORT_TITLE
        .captures(subtitle)
        .and_then(|caps| caps.name("title"))
        .map_or(subtitle, |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_run_on_subtitle() {
        let text = "Chapter 3: The Storm Begins When the rain started falling harder than anyone expected";
        let markers = find_markers(text);
        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!(marker.title, "The Storm Begins");
        assert_eq!(marker.clean_heading, "Chapter 3: The Storm Begins");
        assert_eq!(marker.raw_heading, "Chapter 3");
        assert_eq!(marker.start_offset, 0);
        assert_eq!(marker.matched_text, text);
    }

    #[test]
    fn test_keeps_short_subtitle() {
        let markers = find_markers("CHAPTER XII — The Long Road\n\nBody.");
        assert_eq!(markers[0].title, "The Long Road");
        assert_eq!(markers[0].clean_heading, "CHAPTER XII — The Long Road");
    }

    #[test]
    fn test_default_title_without_subtitle() {
        let markers = find_markers("Ch. 7\n\nBody.\n\nChapter Twelve:\n\nMore.");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].title, "Chapter 7");
        assert_eq!(markers[0].clean_heading, "Chapter 7");
        assert_eq!(markers[1].title, "Chapter Twelve");
    }

    #[test]
    fn test_number_words_prefer_longest() {
        let markers = find_markers("Chapter Seventeen\n\nx\n\nCHAPTER FOUR - Home");
        assert_eq!(markers[0].title, "Chapter Seventeen");
        assert_eq!(markers[1].title, "Home");
        assert_eq!(markers[1].clean_heading, "CHAPTER FOUR - Home");
    }

    #[test]
    fn test_trailing_period_is_a_separator() {
        let markers = find_markers("Chapter 1.\n\nBody.\n\nChapter 2. The Coast\n\nBody.");
        assert_eq!(markers[0].title, "Chapter 1");
        assert_eq!(markers[1].title, "The Coast");
        assert_eq!(markers[1].clean_heading, "Chapter 2. The Coast");
    }

    #[test]
    fn test_punctuation_only_subtitle_is_ignored() {
        let markers = find_markers("Chapter 4 ***\n\nBody.\n\nCHAPTER IX: ...");
        assert_eq!(markers[0].title, "Chapter 4");
        assert_eq!(markers[1].title, "Chapter IX");
    }

    #[test]
    fn test_heading_after_whitespace_only_line() {
        let markers = find_markers("Body text.\n \t\nChapter 2\n\nMore.");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "Chapter 2");
    }

    #[test]
    fn test_ignores_mid_sentence_mentions() {
        let text = "As noted in Chapter 2 of the report, nothing changed.\nChapter 4 follows.";
        assert!(find_markers(text).is_empty());
    }

    #[test]
    fn test_rejects_non_designators() {
        assert!(find_markers("Chapter Dark\n\nChapter 1a").is_empty());
    }

    #[test]
    fn test_offsets_strictly_increase() {
        let text = "Preface text.\n\nChapter 1\n\nAlpha.\n\n  Chapter 2: Beta\n\nGamma.\n\nChapter III\n\nDelta.";
        let markers = find_markers(text);
        assert_eq!(markers.len(), 3);
        assert!(markers.windows(2).all(|w| w[0].start_offset < w[1].start_offset));
        for marker in &markers {
            assert!(text[marker.start_offset..].starts_with(&marker.raw_heading));
        }
    }

    #[test]
    fn test_empty_input_has_no_markers() {
        assert!(find_markers("").is_empty());
    }
}
