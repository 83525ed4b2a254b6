pub mod config;
pub mod extraction;
pub mod posting;
pub mod score;
pub mod source;
pub mod tags;

pub use extraction::JobExtraction;
pub use posting::Posting;
pub use source::{JobSource, ParseError, SourceKind};
