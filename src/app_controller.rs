use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::caption_parser::{self, CaptionSegment};
use crate::clip_materializer::{ClipDescriptor, ClipMaterializer, ClipWindow, MaterializeMode};
use crate::file_utils::FileManager;
use crate::highlight::HighlightDetector;
use crate::lesson_segmenter::{LessonSegmenter, LessonSpec};
use crate::media::ffmpeg::Ffmpeg;
use crate::media::MediaTool;
use crate::timecode;

// @module: Application controller for highlight and lesson workflows

/// Outcome of a highlight run
#[derive(Debug, Serialize)]
pub struct ReelsReport {
    pub clips_folder: PathBuf,
    pub clips: Vec<ClipDescriptor>,
    /// Windows that were detected but could not be cut
    pub skipped: usize,
}

/// Outcome of a lesson run
#[derive(Debug, Serialize)]
pub struct LessonsReport {
    pub lessons_folder: PathBuf,
    pub created: Vec<ClipDescriptor>,
}

/// One caption as shown on a timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub start: String,
    pub end: String,
    pub text: String,
}

impl From<&CaptionSegment> for TimelineEntry {
    fn from(segment: &CaptionSegment) -> Self {
        Self {
            start_seconds: round_centis(segment.start),
            end_seconds: round_centis(segment.end),
            start: timecode::encode(segment.start),
            end: timecode::encode(segment.end),
            text: segment.text.clone(),
        }
    }
}

/// Caption timeline of a video, used to pick lesson boundaries
#[derive(Debug, Serialize)]
pub struct Timeline {
    pub caption_file: PathBuf,
    /// Source duration in seconds, when it could be probed
    pub duration: Option<f64>,
    pub segments: Vec<TimelineEntry>,
}

fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Cut/probe backend
    tool: Box<dyn MediaTool>,
}

impl Controller {
    /// Create a controller backed by ffmpeg
    pub fn with_config(config: Config) -> Result<Self> {
        let tool = Box::new(Ffmpeg::from_config(&config.clips));
        Self::with_tool(config, tool)
    }

    /// Create a controller with an explicit media backend
    pub fn with_tool(config: Config, tool: Box<dyn MediaTool>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config, tool })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Folder receiving highlight clips: `<parent>/<stem><reels_suffix>`
    pub fn reels_folder(&self, video: &Path) -> PathBuf {
        let stem = video.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        video
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(format!("{}{}", stem, self.config.clips.reels_suffix))
    }

    /// Folder receiving lesson clips: `<parent>/<lessons_folder>`
    pub fn lessons_folder(&self, video: &Path) -> PathBuf {
        video
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.config.clips.lessons_folder)
    }

    fn load_segments(&self, video: &Path) -> Result<(PathBuf, Vec<CaptionSegment>)> {
        let caption_file = FileManager::find_caption_for_video(video, &self.config.clips.caption_languages)
            .ok_or_else(|| anyhow!("No caption file found for {}", video.display()))?;

        let segments = caption_parser::parse_caption_file(&caption_file)?;
        if segments.is_empty() {
            return Err(anyhow!("No caption segments could be read from {}", caption_file.display()));
        }

        Ok((caption_file, segments))
    }

    /// Detect highlights in the video's captions and cut them into the reels folder.
    ///
    /// `min_duration`/`max_duration` override the configured bounds.
    pub async fn create_reels(
        &self,
        video: &Path,
        min_duration: Option<f64>,
        max_duration: Option<f64>,
    ) -> Result<ReelsReport> {
        let highlight = &self.config.highlight;
        let min_duration = min_duration.unwrap_or(highlight.min_duration);
        let max_duration = max_duration.unwrap_or(highlight.max_duration);
        highlight.validate_bounds(min_duration, max_duration)?;
        FileManager::require_source_media(video)?;

        let (caption_file, segments) = self.load_segments(video)?;
        info!("Analyzing {} segment(s) from {}", segments.len(), caption_file.display());

        let candidates = HighlightDetector::from_config(highlight).detect(&segments, min_duration, max_duration);
        if candidates.is_empty() {
            return Err(anyhow!(
                "No highlights between {}s and {}s were found in {}",
                min_duration,
                max_duration,
                caption_file.display()
            ));
        }

        let windows: Vec<ClipWindow> = candidates.iter().map(ClipWindow::from).collect();
        let clips_folder = self.reels_folder(video);

        let batch = ClipMaterializer::new(self.tool.as_ref())
            .with_excerpt_chars(self.config.clips.excerpt_chars)
            .materialize(video, &windows, &clips_folder, MaterializeMode::Highlight)
            .await
            .with_context(|| format!("Failed to create clips in {}", clips_folder.display()))?;

        if batch.clips.is_empty() {
            return Err(anyhow!("None of the {} detected highlight(s) could be cut", windows.len()));
        }

        Ok(ReelsReport {
            clips_folder,
            skipped: batch.failures.len(),
            clips: batch.clips,
        })
    }

    /// Cut the given lessons out of the video into the lessons folder
    pub async fn create_lessons(&self, video: &Path, specs: &[LessonSpec]) -> Result<LessonsReport> {
        FileManager::require_source_media(video)?;

        let lessons_folder = self.lessons_folder(video);
        let created = LessonSegmenter::new(self.tool.as_ref())
            .segment(video, specs, &lessons_folder)
            .await?;

        info!("{} lesson(s) created in {}", created.len(), lessons_folder.display());

        Ok(LessonsReport {
            lessons_folder,
            created,
        })
    }

    /// Caption timeline of a video, with its duration when ffprobe can read it
    pub async fn timeline(&self, video: &Path) -> Result<Timeline> {
        FileManager::require_source_media(video)?;
        let (caption_file, segments) = self.load_segments(video)?;

        let duration = match self.tool.probe_duration(video).await {
            Ok(duration) => Some(duration),
            Err(e) => {
                warn!("Could not determine duration of {}: {}", video.display(), e);
                None
            }
        };

        Ok(Timeline {
            caption_file,
            duration,
            segments: segments.iter().map(TimelineEntry::from).collect(),
        })
    }
}
