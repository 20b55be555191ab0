// fencesplit - Split text responses into prose and fenced code segments
// Re-export public modules and types

pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod parsing;
pub mod processor;
pub mod utils;

// Re-export main types for convenience
pub use config::Config;
pub use models::options::{OutputFormat, RenderOptions};
pub use models::segment::{FenceSpan, Segment, SegmentStats};
pub use output::renderer::{Renderer, render_segments};
pub use parsing::{Segments, parse, reconstruct, segments};
pub use processor::Processor;
