pub mod chunker;
pub mod cleaner;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod punctuation;
pub mod summarizer;
pub mod transcript;

pub use error::{SummarizerError, SummarizerResult};
pub use pipeline::{DefaultVideoSummarizer, Summary, VideoSummarizer};
