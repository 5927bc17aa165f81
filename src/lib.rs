/*!
 * # reelcut - caption-driven highlight and lesson clipping
 *
 * A Rust library that reads a video's caption track, finds the stretches most
 * likely to work as standalone highlights, and cuts them (or caller-chosen
 * lesson ranges) into separate files without re-encoding.
 *
 * ## Features
 *
 * - Parse WebVTT/SRT-style caption tracks into timed segments
 * - Rank highlight windows with a tunable, explainable phrase heuristic
 * - Cut clips losslessly through ffmpeg stream copy
 * - Split a video into numbered lessons that never reuse a number
 * - Convert between seconds and `HH:MM:SS.fff` timestamps
 *
 * ## Architecture
 *
 * - `timecode`: timestamp encoding and decoding
 * - `caption_parser`: caption track parsing
 * - `highlight`: highlight scoring and grouping
 * - `clip_materializer`: batch cutting with skip or abort policies
 * - `lesson_segmenter`: lesson validation and sequence numbering
 * - `media`: the cut/probe capability, its ffmpeg backend and a mock
 * - `file_utils`: file system helpers
 * - `app_config`: configuration
 * - `app_controller`: end-to-end reels, lessons and timeline workflows
 * - `errors`: error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption_parser;
pub mod clip_materializer;
pub mod errors;
pub mod file_utils;
pub mod highlight;
pub mod lesson_segmenter;
pub mod media;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use caption_parser::{parse_captions, CaptionSegment};
pub use clip_materializer::{ClipBatch, ClipDescriptor, ClipMaterializer, ClipWindow, MaterializeMode};
pub use errors::ClipError;
pub use highlight::{HighlightCandidate, HighlightDetector, Lexicon, ScoringWeights};
pub use lesson_segmenter::{LessonSegmenter, LessonSpec};
pub use media::{CutRequest, MediaTool};
