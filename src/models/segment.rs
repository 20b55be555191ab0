use serde::Serialize;
use std::ops::Range;

/// A contiguous piece of a response, either prose or a fenced code block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment<'a> {
    /// Prose, exactly as it appears in the input
    Text { content: &'a str },
    /// A fenced code block with the tag written after the opening marker
    Code {
        language: &'a str,
        content: &'a str,
    },
}

impl<'a> Segment<'a> {
    pub fn content(&self) -> &'a str {
        match self {
            Segment::Text { content } | Segment::Code { content, .. } => *content,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code { .. })
    }
}

/// Byte offsets of one matched fence in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSpan {
    /// Offset of the opening marker
    pub start: usize,
    /// Offset just past the closing marker
    pub end: usize,
    pub language: Range<usize>,
    pub content: Range<usize>,
}

/// Counts gathered over a segment sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStats {
    pub text_segments: usize,
    pub code_segments: usize,
    /// Distinct non-empty tags in order of first appearance
    pub languages: Vec<String>,
}

impl SegmentStats {
    pub fn from_segments(segments: &[Segment<'_>]) -> Self {
        let mut stats = Self::default();

        for segment in segments {
            match segment {
                Segment::Text { .. } => stats.text_segments += 1,
                Segment::Code { language, .. } => {
                    stats.code_segments += 1;
                    if !language.is_empty() && !stats.languages.iter().any(|l| l == language) {
                        stats.languages.push((*language).to_string());
                    }
                }
            }
        }

        stats
    }

    pub fn total(&self) -> usize {
        self.text_segments + self.code_segments
    }

    pub fn absorb(&mut self, other: &SegmentStats) {
        self.text_segments += other.text_segments;
        self.code_segments += other.code_segments;
        for language in &other.languages {
            if !self.languages.contains(language) {
                self.languages.push(language.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_serializes_with_type_tag() {
        let text = Segment::Text { content: "hi\n" };
        let code = Segment::Code {
            language: "rust",
            content: "fn main() {}\n",
        };

        assert_eq!(
            serde_json::to_string(&text).unwrap(),
            r#"{"type":"text","content":"hi\n"}"#
        );
        assert_eq!(
            serde_json::to_string(&code).unwrap(),
            r#"{"type":"code","language":"rust","content":"fn main() {}\n"}"#
        );
    }

    #[test]
    fn test_stats_deduplicate_languages() {
        let segments = [
            Segment::Text { content: "a" },
            Segment::Code {
                language: "js",
                content: "1",
            },
            Segment::Code {
                language: "",
                content: "2",
            },
            Segment::Text { content: "b" },
            Segment::Code {
                language: "js",
                content: "3",
            },
            Segment::Code {
                language: "css",
                content: "4",
            },
        ];

        let stats = SegmentStats::from_segments(&segments);
        assert_eq!(stats.text_segments, 2);
        assert_eq!(stats.code_segments, 4);
        assert_eq!(stats.total(), 6);
        assert_eq!(stats.languages, vec!["js", "css"]);
    }

    #[test]
    fn test_absorb_merges_counts() {
        let mut total = SegmentStats {
            text_segments: 1,
            code_segments: 1,
            languages: vec!["python".to_string()],
        };
        total.absorb(&SegmentStats {
            text_segments: 2,
            code_segments: 3,
            languages: vec!["python".to_string(), "html".to_string()],
        });

        assert_eq!(total.text_segments, 3);
        assert_eq!(total.code_segments, 4);
        assert_eq!(total.languages, vec!["python", "html"]);
    }
}
