use crate::models::{Chapter, Marker};

/// Computes the content span each marker owns. Content starts after the
/// marker's clean heading and ends where the next marker starts. Chapters
/// whose trimmed content is not longer than `min_chapter_chars` are dropped;
/// those are usually table-of-contents entries.
///
/// The clean heading is searched for only inside the marker's own heading
/// line, so a short title repeated nearby cannot pull the boundary forward.
pub fn split(normalized: &str, markers: &[Marker], min_chapter_chars: usize) -> Vec<Chapter> {
    let mut chapters = Vec::with_capacity(markers.len());

    for (i, marker) in markers.iter().enumerate() {
        let end = markers
            .get(i + 1)
            .map_or(normalized.len(), |next| next.start_offset);
        let start = content_start(normalized, marker).min(end);
        let content = normalized[start..end].trim();

        if content.chars().count() <= min_chapter_chars {
            tracing::debug!(
                title = %marker.title,
                chars = content.chars().count(),
                "dropping chapter below minimum length"
            );
            continue;
        }

        chapters.push(Chapter::new(marker.title.clone(), content));
    }

    chapters
}

/// Text ahead of the first marker, if it is long enough to stand as its own chapter.
pub fn front_matter<'a>(
    normalized: &'a str,
    markers: &[Marker],
    min_chapter_chars: usize,
) -> Option<&'a str> {
    let first = markers.first()?;
    let preface = normalized[..first.start_offset].trim();
    (preface.chars().count() > min_chapter_chars).then_some(preface)
}

fn content_start(normalized: &str, marker: &Marker) -> usize {
    let start = marker.start_offset;
    let window_end = (start + marker.matched_text.len()).min(normalized.len());
    let window = &normalized[start..window_end];

    match window.find(&marker.clean_heading) {
        Some(pos) => {
            let after = start + pos + marker.clean_heading.len();
            // Punctuation left on the heading line ("Chapter 1.") is not content.
            if normalized[after..window_end]
                .chars()
                .any(char::is_alphanumeric)
            {
                after
            } else {
                window_end
            }
        }
        None => {
            tracing::trace!(
                heading = %marker.clean_heading,
                "clean heading not found verbatim, skipping whole heading line"
            );
            window_end
        }
    }
}
