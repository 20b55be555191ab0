use crate::models::options::RenderOptions;
use crate::models::segment::SegmentStats;
use crate::output::renderer::render_segments;
use crate::parsing::parse;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name used for responses read from standard input
pub const STDIN_SOURCE: &str = "<stdin>";

#[derive(Debug, Clone)]
pub struct ProcessedResponse {
    /// File path, or `<stdin>`
    pub source: String,
    pub rendered: String,
    pub stats: SegmentStats,
}

#[derive(Debug, Default)]
pub struct Processor;

impl Processor {
    pub fn new() -> Self {
        Self
    }

    /// Process a single response file
    pub fn process_file(&self, path: &Path, options: &RenderOptions) -> Result<ProcessedResponse> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        self.process_text(&path.display().to_string(), &content, options)
            .with_context(|| format!("Failed to render file: {}", path.display()))
    }

    /// Process response text that is already in memory
    pub fn process_text(
        &self,
        source: &str,
        content: &str,
        options: &RenderOptions,
    ) -> Result<ProcessedResponse> {
        let segments = parse(content);
        let stats = SegmentStats::from_segments(&segments);

        log::debug!(
            "{}: {} text segment(s), {} code block(s)",
            source,
            stats.text_segments,
            stats.code_segments
        );

        let rendered = render_segments(&segments, options)?;

        Ok(ProcessedResponse {
            source: source.to_string(),
            rendered,
            stats,
        })
    }

    /// Process many files in parallel; results keep the order of `paths`
    pub fn process_files(
        &self,
        paths: &[PathBuf],
        options: &RenderOptions,
    ) -> Vec<(PathBuf, Result<ProcessedResponse>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.process_file(path, options)))
            .collect()
    }
}

/// Writes rendered responses to stdout or an output directory
pub struct OutputWriter {
    output_dir: Option<PathBuf>,
    dry_run: bool,
    verbose: bool,
    /// Output files claimed during this run, mapped to the source that claimed them
    claimed: HashMap<PathBuf, String>,
}

impl OutputWriter {
    pub fn new(output_dir: Option<PathBuf>, dry_run: bool, verbose: bool) -> Self {
        Self {
            output_dir,
            dry_run,
            verbose,
            claimed: HashMap::new(),
        }
    }

    /// Path a response is written to when an output directory is set
    pub fn target_path(&self, response: &ProcessedResponse, extension: &str) -> Option<PathBuf> {
        let dir = self.output_dir.as_ref()?;
        let stem = Path::new(&response.source)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty() && response.source != STDIN_SOURCE)
            .unwrap_or("stdin");
        Some(dir.join(format!("{}.{}", stem, extension)))
    }

    /// Write one response.
    ///
    /// `with_banner` prefixes stdout output with the source name so several
    /// responses can be told apart. In an output directory each target file
    /// belongs to the first response mapped to it; a later response with the
    /// same target is an error and nothing is written for it.
    pub fn write_response(
        &mut self,
        response: &ProcessedResponse,
        extension: &str,
        with_banner: bool,
        out: &mut impl std::io::Write,
    ) -> Result<()> {
        let Some(target) = self.target_path(response, extension) else {
            if with_banner {
                writeln!(out, "==> {} <==", response.source)?;
            }
            out.write_all(response.rendered.as_bytes())?;
            return Ok(());
        };

        if let Some(first) = self.claimed.get(&target) {
            return Err(anyhow::anyhow!(
                "Output file {} is already used by {}",
                target.display(),
                first
            ));
        }
        self.claimed.insert(target.clone(), response.source.clone());

        if self.dry_run {
            println!("[DRY RUN] Would write: {}", target.display());
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }

        std::fs::write(&target, &response.rendered)
            .with_context(|| format!("Failed to write file: {}", target.display()))?;

        if self.verbose {
            println!(
                "✓ Wrote: {} ({} segment(s))",
                target.display(),
                response.stats.total()
            );
        } else {
            println!("Wrote: {}", target.display());
        }

        Ok(())
    }

    pub fn print_summary(&self, total_responses: usize, stats: &SegmentStats, failed: usize) {
        if !self.verbose && failed == 0 {
            return;
        }

        eprintln!(
            "\nSummary: {} response(s), {} text segment(s), {} code block(s)",
            total_responses, stats.text_segments, stats.code_segments
        );

        if !stats.languages.is_empty() {
            eprintln!("Languages: {}", stats.languages.join(", "));
        }

        if failed > 0 {
            eprintln!("{} response(s) could not be processed", failed);
        }
    }
}
