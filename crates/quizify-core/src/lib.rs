//! quizify-core — Text segmentation, quiz model, parsing and grading.
//!
//! This crate defines the math/currency segmenter that every rendered string
//! passes through, plus the quiz data model and session scoring that the rest
//! of quizify builds on.

pub mod currency;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod segment;

pub use error::ScoreError;
pub use segment::{segment, segment_with, Segment, SegmentOptions};
