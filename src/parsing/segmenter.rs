use crate::models::segment::{FenceSpan, Segment};
use crate::parsing::fence::{FENCE_MARKER, find_fence_spans};

/// Lazy iterator over the segments of a response.
///
/// Fence spans are located once when the iterator is created; slicing the
/// input between them happens on demand. Cloning the iterator restarts
/// iteration from the clone's position without rescanning.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    input: &'a str,
    spans: std::vec::IntoIter<FenceSpan>,
    pending: Option<FenceSpan>,
    cursor: usize,
}

impl<'a> Segments<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            spans: find_fence_spans(input).into_iter(),
            pending: None,
            cursor: 0,
        }
    }

    fn code(&mut self, span: FenceSpan) -> Segment<'a> {
        let input = self.input;
        self.cursor = span.end;
        Segment::Code {
            language: &input[span.language],
            content: &input[span.content],
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(span) = self.pending.take() {
            return Some(self.code(span));
        }

        let input = self.input;
        match self.spans.next() {
            Some(span) if span.start > self.cursor => {
                let content = &input[self.cursor..span.start];
                self.cursor = span.start;
                self.pending = Some(span);
                Some(Segment::Text { content })
            }
            Some(span) => Some(self.code(span)),
            None if self.cursor < input.len() => {
                let content = &input[self.cursor..];
                self.cursor = input.len();
                Some(Segment::Text { content })
            }
            None => None,
        }
    }
}

impl std::iter::FusedIterator for Segments<'_> {}

/// Iterate over the segments of `input` in order
pub fn segments(input: &str) -> Segments<'_> {
    Segments::new(input)
}

/// Split `input` into prose and fenced code segments.
///
/// Never fails: unterminated or malformed fences stay in the surrounding
/// text. An empty input yields no segments.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
    segments(input).collect()
}

/// Rebuild the original text from its segments
pub fn reconstruct(segments: &[Segment<'_>]) -> String {
    let mut output = String::new();

    for segment in segments {
        match segment {
            Segment::Text { content } => output.push_str(content),
            Segment::Code { language, content } => {
                output.push_str(FENCE_MARKER);
                output.push_str(language);
                output.push('\n');
                output.push_str(content);
                output.push_str(FENCE_MARKER);
            }
        }
    }

    output
}
