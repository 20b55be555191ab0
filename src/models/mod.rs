pub mod options;
pub mod segment;
