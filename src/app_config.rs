use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::highlight::{Lexicon, ScoringWeights, DEFAULT_MAX_CANDIDATES};

/// Application configuration module
/// This module handles loading defaults and validating the settings that
/// drive highlight detection and clip cutting.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Highlight detection settings
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Clip output and external tool settings
    #[serde(default)]
    pub clips: ClipConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Highlight detection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HighlightConfig {
    /// Shortest accepted highlight, in seconds
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,

    /// Longest accepted highlight, in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,

    /// Number of ranked candidates kept
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Per-feature scoring weights
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Trigger phrases
    #[serde(default)]
    pub lexicon: Lexicon,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            max_candidates: default_max_candidates(),
            weights: ScoringWeights::default(),
            lexicon: Lexicon::default(),
        }
    }
}

/// Clip materialization configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClipConfig {
    // @field: ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Folder, next to the source video, receiving lesson clips
    #[serde(default = "default_lessons_folder")]
    pub lessons_folder: String,

    /// Suffix appended to the video stem to name the highlight folder
    #[serde(default = "default_reels_suffix")]
    pub reels_suffix: String,

    /// Characters of caption text kept in each clip excerpt
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Wall-clock limit for a single ffmpeg/ffprobe run (None disables it)
    #[serde(default)]
    pub cut_timeout_secs: Option<u64>,

    /// Caption language suffixes tried, in order, when looking up `<stem>.<lang>.vtt`
    #[serde(default = "default_caption_languages")]
    pub caption_languages: Vec<String>,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            lessons_folder: default_lessons_folder(),
            reels_suffix: default_reels_suffix(),
            excerpt_chars: default_excerpt_chars(),
            cut_timeout_secs: None,
            caption_languages: default_caption_languages(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_min_duration() -> f64 {
    15.0
}

fn default_max_duration() -> f64 {
    60.0
}

fn default_max_candidates() -> usize {
    DEFAULT_MAX_CANDIDATES
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_lessons_folder() -> String {
    "assuntos".to_string()
}

fn default_reels_suffix() -> String {
    "_reels".to_string()
}

fn default_excerpt_chars() -> usize {
    100
}

fn default_caption_languages() -> Vec<String> {
    vec!["pt".to_string(), "pt-BR".to_string(), "pt-PT".to_string()]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.highlight.validate_bounds(self.highlight.min_duration, self.highlight.max_duration)?;

        if self.highlight.max_candidates == 0 {
            return Err(anyhow!("highlight.max_candidates must be at least 1"));
        }

        if self.clips.ffmpeg_path.trim().is_empty() || self.clips.ffprobe_path.trim().is_empty() {
            return Err(anyhow!("ffmpeg and ffprobe paths must not be empty"));
        }

        if self.clips.lessons_folder.trim().is_empty() {
            return Err(anyhow!("clips.lessons_folder must not be empty"));
        }

        Ok(())
    }
}

impl HighlightConfig {
    /// Check a pair of duration bounds, also used for per-request overrides
    pub fn validate_bounds(&self, min_duration: f64, max_duration: f64) -> Result<()> {
        if !min_duration.is_finite() || !max_duration.is_finite() {
            return Err(anyhow!("Duration bounds must be finite numbers"));
        }
        if min_duration < 0.0 {
            return Err(anyhow!("Minimum duration must not be negative: {}", min_duration));
        }
        if min_duration > max_duration {
            return Err(anyhow!(
                "Minimum duration {} exceeds maximum duration {}",
                min_duration,
                max_duration
            ));
        }
        Ok(())
    }
}
