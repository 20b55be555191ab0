pub mod fence;
pub mod segmenter;

pub use segmenter::{Segments, parse, reconstruct, segments};
