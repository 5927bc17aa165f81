/*!
 * Turns time windows into clip files through a `MediaTool`.
 *
 * Windows are cut one after another. Highlight batches skip failed windows
 * and report them alongside the clips that were written; lesson batches stop
 * at the first failure and leave earlier clips in place. A lesson never
 * replaces a file already in the destination.
 */

use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::errors::ClipError;
use crate::file_utils::FileManager;
use crate::highlight::HighlightCandidate;
use crate::media::{CutRequest, MediaTool};

/// Extension used for highlight clips when the source has none
const FALLBACK_EXTENSION: &str = "mp4";

/// Default number of characters kept in a clip excerpt
pub const DEFAULT_EXCERPT_CHARS: usize = 100;

/// A window to cut out of the source
#[derive(Debug, Clone, PartialEq)]
pub struct ClipWindow {
    pub start: f64,
    pub duration: f64,
    /// Caption text for highlights, sanitized title for lessons
    pub label: String,
}

impl ClipWindow {
    pub fn new(start: f64, duration: f64, label: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            label: label.into(),
        }
    }
}

impl From<&HighlightCandidate> for ClipWindow {
    fn from(candidate: &HighlightCandidate) -> Self {
        Self::new(candidate.start, candidate.duration, candidate.text.clone())
    }
}

/// How failures inside a batch are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeMode {
    /// Skip failed windows and keep going
    Highlight,
    /// Abort on the first failure; numbering starts at `first_sequence`
    Lesson { first_sequence: u32 },
}

/// A clip that was written to disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipDescriptor {
    /// Highlight index or lesson sequence number
    pub sequence: u32,
    pub start: f64,
    pub duration: f64,
    pub filename: String,
    pub path: PathBuf,
    /// Shortened caption text, or the lesson title
    pub excerpt: String,
}

/// A highlight window that could not be cut
#[derive(Debug)]
pub struct ClipFailure {
    pub index: u32,
    pub start: f64,
    pub error: ClipError,
}

/// Result of a materialization call
#[derive(Debug, Default)]
pub struct ClipBatch {
    pub clips: Vec<ClipDescriptor>,
    /// Skipped highlight windows; always empty in lesson mode
    pub failures: Vec<ClipFailure>,
}

impl ClipBatch {
    /// Some windows failed while others were written
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// `clip_{index:02}_{floor(start)}s.{ext}`
pub fn highlight_filename(index: u32, start: f64, extension: &str) -> String {
    format!("clip_{:02}_{}s.{}", index, start.max(0.0).floor() as u64, extension)
}

/// `{sequence:02} - {title}.{ext}`
pub fn lesson_filename(sequence: u32, title: &str, extension: &str) -> String {
    format!("{:02} - {}.{}", sequence, title, extension)
}

/// Keep the first `max_chars` characters, marking truncation with `...`
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Cuts windows from a single source into a destination folder
#[derive(Debug)]
pub struct ClipMaterializer<'a> {
    tool: &'a dyn MediaTool,
    excerpt_chars: usize,
}

impl<'a> ClipMaterializer<'a> {
    pub fn new(tool: &'a dyn MediaTool) -> Self {
        Self {
            tool,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    /// Cut every window into `destination`, creating it if needed.
    ///
    /// Returns `Err` in highlight mode only when the destination cannot be
    /// created. In lesson mode the first failed cut returns
    /// `ClipError::LessonAborted` and the remaining windows are not attempted.
    pub async fn materialize(
        &self,
        source: &Path,
        windows: &[ClipWindow],
        destination: &Path,
        mode: MaterializeMode,
    ) -> Result<ClipBatch, ClipError> {
        FileManager::ensure_dir(destination)?;

        let batch = match mode {
            MaterializeMode::Highlight => self.cut_highlights(source, windows, destination).await,
            MaterializeMode::Lesson { first_sequence } => {
                self.cut_lessons(source, windows, destination, first_sequence).await?
            }
        };

        info!(
            "Created {} clip(s) in {}{}",
            batch.clips.len(),
            destination.display(),
            if batch.is_partial() {
                format!(" ({} skipped)", batch.failures.len())
            } else {
                String::new()
            }
        );

        Ok(batch)
    }

    async fn cut_highlights(&self, source: &Path, windows: &[ClipWindow], destination: &Path) -> ClipBatch {
        let extension = FileManager::extension_or(source, FALLBACK_EXTENSION);
        let mut batch = ClipBatch::default();

        for (position, window) in windows.iter().enumerate() {
            let index = position as u32 + 1;
            let filename = highlight_filename(index, window.start, &extension);

            match self.cut_one(source, window, destination, &filename).await {
                Ok(path) => batch.clips.push(ClipDescriptor {
                    sequence: index,
                    start: window.start,
                    duration: window.duration,
                    filename,
                    path,
                    excerpt: excerpt(&window.label, self.excerpt_chars),
                }),
                Err(e) => {
                    warn!("Skipping clip {} at {:.2}s: {}", index, window.start, e);
                    batch.failures.push(ClipFailure {
                        index,
                        start: window.start,
                        error: e,
                    });
                }
            }
        }

        batch
    }

    async fn cut_lessons(
        &self,
        source: &Path,
        windows: &[ClipWindow],
        destination: &Path,
        first_sequence: u32,
    ) -> Result<ClipBatch, ClipError> {
        let extension = FileManager::extension_or(source, FALLBACK_EXTENSION);
        let mut batch = ClipBatch::default();
        let mut sequence = first_sequence;

        for window in windows {
            let filename = lesson_filename(sequence, &window.label, &extension);
            let output = destination.join(&filename);

            let cut = if output.exists() {
                Err(ClipError::OutputExists { path: output })
            } else {
                self.cut_one(source, window, destination, &filename).await
            };

            match cut {
                Ok(path) => batch.clips.push(ClipDescriptor {
                    sequence,
                    start: window.start,
                    duration: window.duration,
                    filename,
                    path,
                    excerpt: window.label.clone(),
                }),
                Err(e) => {
                    error!("Lesson {:02} \"{}\" failed: {}", sequence, window.label, e);
                    return Err(ClipError::LessonAborted {
                        sequence,
                        title: window.label.clone(),
                        completed: batch.clips.len(),
                        source: Box::new(e),
                    });
                }
            }

            sequence += 1;
        }

        Ok(batch)
    }

    async fn cut_one(
        &self,
        source: &Path,
        window: &ClipWindow,
        destination: &Path,
        filename: &str,
    ) -> Result<PathBuf, ClipError> {
        let output = destination.join(filename);
        debug!("Cutting {} ({:.2}s + {:.2}s)", filename, window.start, window.duration);

        let request = CutRequest {
            source: source.to_path_buf(),
            start: window.start,
            duration: window.duration,
            output: output.clone(),
        };
        self.tool.cut(&request).await?;

        Ok(output)
    }
}
