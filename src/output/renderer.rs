use crate::models::options::{OutputFormat, RenderOptions};
use crate::models::segment::Segment;
use crate::parsing::reconstruct;
use anyhow::{Context, Result};

/// Turns a segment sequence into output text
pub trait Renderer {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String>;
}

/// Append every line of `content` followed by `line_break`, including the
/// last one, so embedded newlines survive as explicit breaks.
fn push_lines(output: &mut String, content: &str, line_break: &str, escape: bool) {
    for line in content.split('\n') {
        if escape {
            output.push_str(&html_escape::encode_text(line));
        } else {
            output.push_str(line);
        }
        output.push_str(line_break);
    }
}

pub struct PlainRenderer<'o> {
    options: &'o RenderOptions,
}

impl<'o> PlainRenderer<'o> {
    pub fn new(options: &'o RenderOptions) -> Self {
        Self { options }
    }

    fn push_text(output: &mut String, content: &str) {
        push_lines(output, content, "\n", false);
    }
}

impl Renderer for PlainRenderer<'_> {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String> {
        let mut output = String::new();

        for segment in segments {
            match segment {
                Segment::Text { content } => Self::push_text(&mut output, content),
                Segment::Code { language, content } => {
                    let header = self.options.language_hint(language).unwrap_or("code");
                    output.push_str(&format!("--- {} ---\n", header));
                    output.push_str(content);
                    if !content.is_empty() && !content.ends_with('\n') {
                        output.push('\n');
                    }
                    output.push_str("---\n");
                }
            }
        }

        Ok(output)
    }
}

pub struct HtmlRenderer<'o> {
    options: &'o RenderOptions,
}

impl<'o> HtmlRenderer<'o> {
    pub fn new(options: &'o RenderOptions) -> Self {
        Self { options }
    }

    fn push_text(output: &mut String, class: &str, content: &str) {
        output.push_str(&format!("<div class=\"{}\">\n", class));
        push_lines(output, content, "<br />\n", true);
        output.push_str("</div>\n");
    }
}

impl Renderer for HtmlRenderer<'_> {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String> {
        let mut output = String::new();

        for segment in segments {
            match segment {
                Segment::Text { content } => Self::push_text(&mut output, "text", content),
                Segment::Code { language, content } => {
                    match self.options.language_hint(language) {
                        Some(hint) => output.push_str(&format!(
                            "<pre><code class=\"language-{}\">",
                            html_escape::encode_double_quoted_attribute(hint)
                        )),
                        None => output.push_str("<pre><code>"),
                    }
                    output.push_str(&html_escape::encode_text(content));
                    output.push_str("</code></pre>\n");
                }
            }
        }

        Ok(output)
    }
}

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String> {
        let mut output =
            serde_json::to_string_pretty(segments).context("Failed to serialize segments")?;
        output.push('\n');
        Ok(output)
    }
}

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String> {
        Ok(reconstruct(segments))
    }
}

/// Render `segments` in the format chosen by `options`, adding the raw
/// response section when requested and supported.
pub fn render_segments(segments: &[Segment<'_>], options: &RenderOptions) -> Result<String> {
    let rendered = match options.format {
        OutputFormat::Plain => PlainRenderer::new(options).render(segments)?,
        OutputFormat::Html => HtmlRenderer::new(options).render(segments)?,
        OutputFormat::Json => JsonRenderer.render(segments)?,
        OutputFormat::Markdown => MarkdownRenderer.render(segments)?,
    };

    if !options.show_raw || !options.format.supports_raw_section() || segments.is_empty() {
        return Ok(rendered);
    }

    let raw = reconstruct(segments);
    let mut output = String::new();

    match options.format {
        OutputFormat::Html => {
            output.push_str("<p>Raw response:</p>\n");
            HtmlRenderer::push_text(&mut output, "raw", &raw);
            output.push_str("<p>Response:</p>\n");
        }
        _ => {
            output.push_str("Raw response:\n");
            PlainRenderer::push_text(&mut output, &raw);
            output.push_str("\nResponse:\n");
        }
    }

    output.push_str(&rendered);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;
    use pretty_assertions::assert_eq;

    fn options(format: OutputFormat) -> RenderOptions {
        RenderOptions {
            format,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_breaks_every_line() {
        let segments = parse("first\nsecond");
        let output = render_segments(&segments, &options(OutputFormat::Plain)).unwrap();
        assert_eq!(output, "first\nsecond\n");
    }

    #[test]
    fn test_plain_keeps_trailing_break_after_final_newline() {
        let segments = parse("line\n");
        let output = render_segments(&segments, &options(OutputFormat::Plain)).unwrap();
        assert_eq!(output, "line\n\n");
    }

    #[test]
    fn test_plain_frames_code_blocks() {
        let segments = parse("Use this:\n```python\nprint(1)\n```");
        let output = render_segments(&segments, &options(OutputFormat::Plain)).unwrap();
        assert_eq!(output, "Use this:\n\n--- python ---\nprint(1)\n---\n");
    }

    #[test]
    fn test_plain_closes_block_without_trailing_newline() {
        let segments = parse("```\nx = 1```");
        let output = render_segments(&segments, &options(OutputFormat::Plain)).unwrap();
        assert_eq!(output, "--- code ---\nx = 1\n---\n");
    }

    #[test]
    fn test_fallback_language_does_not_change_segment() {
        let segments = parse("```\nx = 1\n```");
        let render_options = RenderOptions {
            fallback_language: Some("python".to_string()),
            ..Default::default()
        };

        let output = render_segments(&segments, &render_options).unwrap();
        assert_eq!(output, "--- python ---\nx = 1\n---\n");
        assert_eq!(
            segments[0],
            Segment::Code {
                language: "",
                content: "x = 1\n"
            }
        );
    }

    #[test]
    fn test_html_escapes_text_and_code() {
        let segments = parse("a < b\n```html\n<p class=\"x\">&</p>\n```");
        let output = render_segments(&segments, &options(OutputFormat::Html)).unwrap();
        assert_eq!(
            output,
            "<div class=\"text\">\na &lt; b<br />\n<br />\n</div>\n\
             <pre><code class=\"language-html\">&lt;p class=\"x\"&gt;&amp;&lt;/p&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_html_untagged_block_has_no_class() {
        let segments = parse("```\nplain\n```");
        let output = render_segments(&segments, &options(OutputFormat::Html)).unwrap();
        assert_eq!(output, "<pre><code>plain\n</code></pre>\n");
    }

    #[test]
    fn test_json_shape() {
        let segments = parse("hi ```sh\nls\n```");
        let output = render_segments(&segments, &options(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value,
            serde_json::json!([
                {"type": "text", "content": "hi "},
                {"type": "code", "language": "sh", "content": "ls\n"}
            ])
        );
    }

    #[test]
    fn test_markdown_reproduces_input() {
        let input = "pre ```python\nprint(1)\n``` post";
        let output = render_segments(&parse(input), &options(OutputFormat::Markdown)).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_response_renders_nothing() {
        for format in [OutputFormat::Plain, OutputFormat::Html, OutputFormat::Markdown] {
            let output = render_segments(&[], &options(format)).unwrap();
            assert_eq!(output, "");
        }
        let json = render_segments(&[], &options(OutputFormat::Json)).unwrap();
        assert_eq!(json, "[]\n");
    }

    #[test]
    fn test_raw_section_precedes_response() {
        let segments = parse("x ```c\ny\n```");
        let render_options = RenderOptions {
            show_raw: true,
            ..Default::default()
        };

        let output = render_segments(&segments, &render_options).unwrap();
        assert_eq!(
            output,
            "Raw response:\nx ```c\ny\n```\n\nResponse:\nx \n--- c ---\ny\n---\n"
        );
    }

    #[test]
    fn test_raw_section_skipped_for_machine_formats() {
        let segments = parse("x");
        let render_options = RenderOptions {
            format: OutputFormat::Json,
            show_raw: true,
            ..Default::default()
        };

        let output = render_segments(&segments, &render_options).unwrap();
        assert!(!output.contains("Raw response"));
    }
}
