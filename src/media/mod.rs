/*!
 * External media capabilities.
 *
 * The engine needs exactly two things from the outside world: a lossless cut
 * of a time window into a new file, and the duration of a source file. Both
 * sit behind `MediaTool` so the clip pipeline can be driven by the ffmpeg
 * implementation in production and by `mock::MockMediaTool` in tests.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::ClipError;

/// Container extensions accepted as clip sources
pub const SOURCE_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "m4a"];

/// Extensions counted as existing clips when numbering lessons
pub const CLIP_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "m4a", "mp3"];

/// One lossless cut of `source` into `output`
#[derive(Debug, Clone, PartialEq)]
pub struct CutRequest {
    pub source: PathBuf,
    /// Window start in seconds
    pub start: f64,
    /// Window length in seconds
    pub duration: f64,
    pub output: PathBuf,
}

/// Cut and probe operations backed by an external tool
#[async_trait]
pub trait MediaTool: Send + Sync + Debug {
    /// Copy the requested window into `request.output` without re-encoding.
    ///
    /// Implementations must shift output timestamps so the clip starts at
    /// zero instead of carrying negative timestamps from the cut point.
    async fn cut(&self, request: &CutRequest) -> Result<(), ClipError>;

    /// Duration of a media file in seconds
    async fn probe_duration(&self, source: &Path) -> Result<f64, ClipError>;
}

/// True when the path ends in one of the given extensions (case-insensitive)
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

pub mod ffmpeg;
pub mod mock;
