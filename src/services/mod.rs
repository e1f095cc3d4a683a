pub mod boundary;
pub mod chapterizer;
pub mod fallback;
pub mod markers;
pub mod normalizer;
pub mod pdf;
pub mod prose;
