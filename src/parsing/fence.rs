use crate::models::segment::FenceSpan;
use regex::Regex;
use std::sync::OnceLock;

/// Marker that opens and closes a fenced block
pub const FENCE_MARKER: &str = "```";

/// A fence anchored at the start of the haystack: marker, word-character
/// tag, line feed, then the shortest body up to the next marker.
const FENCE_PATTERN: &str = r"(?s)\A```(\w*)\n(.*?)```";

const TAG_PATTERN: &str = r"\A\w*\z";

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn compile(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|e| {
            panic!("Invalid fence pattern {}: {}", pattern, e);
        })
    })
}

/// Find every fenced block in `text`, left to right, without overlap.
///
/// Each marker is tried as an opener in order. A marker that does not open
/// a well-formed, terminated fence is skipped together with the backticks
/// directly following it, so a malformed run never yields an opener from
/// its own tail.
pub fn find_fence_spans(text: &str) -> Vec<FenceSpan> {
    let fence = compile(&FENCE_REGEX, FENCE_PATTERN);
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(found) = text[pos..].find(FENCE_MARKER) {
        let start = pos + found;

        let Some(caps) = fence.captures(&text[start..]) else {
            let run = text[start..].bytes().take_while(|b| *b == b'`').count();
            pos = start + run;
            continue;
        };

        let (Some(whole), Some(language), Some(content)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            break;
        };

        spans.push(FenceSpan {
            start,
            end: start + whole.end(),
            language: start + language.start()..start + language.end(),
            content: start + content.start()..start + content.end(),
        });
        pos = start + whole.end();
    }

    spans
}

/// Check whether a string can be used as a fence tag: letters, digits and
/// underscores only
pub fn is_valid_language_tag(tag: &str) -> bool {
    compile(&TAG_REGEX, TAG_PATTERN).is_match(tag)
}
