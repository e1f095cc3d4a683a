use serde::{Deserialize, Serialize};

/// A finished chapter: a non-empty title and paragraphs separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Chapter {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A candidate chapter heading found in normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Keyword plus designator as written, e.g. `Chapter 3` or `CHAPTER XII`.
    pub raw_heading: String,
    /// Byte offset of the heading in the normalized text.
    pub start_offset: usize,
    /// The whole heading line the detector matched, subtitle included.
    pub matched_text: String,
    pub title: String,
    /// Heading reduced to `<prefix><separator> <title>`, used to find where content starts.
    pub clean_heading: String,
}

/// Which stage of the cascade produced a chapter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Markers,
    PageBreaks,
    WholeDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub chapters: Vec<Chapter>,
    pub strategy: Strategy,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub chapters: Vec<Chapter>,
    pub total_pages: usize,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct ChaptersResponse {
    pub success: bool,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
