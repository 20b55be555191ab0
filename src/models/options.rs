use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for rendered responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Prose line by line, code blocks framed by header and footer lines
    #[default]
    Plain,
    /// HTML fragment with escaped prose and `<pre><code>` blocks
    Html,
    /// JSON array of segments
    Json,
    /// The response rebuilt from its segments
    Markdown,
}

impl OutputFormat {
    /// File extension used when writing to an output directory
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "txt",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }

    /// Whether the format may be prefixed with the raw response
    pub fn supports_raw_section(&self) -> bool {
        matches!(self, OutputFormat::Plain | OutputFormat::Html)
    }
}

/// Options for rendering a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Highlighting hint for code blocks written without a tag
    pub fallback_language: Option<String>,
    /// Prefix the output with the unsegmented response
    pub show_raw: bool,
}

impl RenderOptions {
    /// Language hint to use for a block tagged with `language`
    pub fn language_hint<'a>(&'a self, language: &'a str) -> Option<&'a str> {
        if !language.is_empty() {
            return Some(language);
        }
        self.fallback_language
            .as_deref()
            .filter(|fallback| !fallback.is_empty())
    }
}
