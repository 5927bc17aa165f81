/*!
 * Splits a source video into named lessons at caller-chosen timestamps.
 *
 * Every lesson is validated before anything touches the disk. Lesson files
 * are numbered past both the count of media files already in the destination
 * and their highest `NN - ` prefix, so repeated requests into the same folder
 * keep counting up and never reuse a number. Two requests writing to one
 * folder at the same time can still pick the same number; callers must
 * serialize requests per destination folder.
 */

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clip_materializer::{ClipDescriptor, ClipMaterializer, ClipWindow, MaterializeMode};
use crate::errors::ClipError;
use crate::file_utils::FileManager;
use crate::media::MediaTool;
use crate::timecode;

/// Title used when sanitizing leaves nothing behind
pub const DEFAULT_LESSON_TITLE: &str = "aula";

static UNSAFE_TITLE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9 _\-]+").expect("title sanitizer regex is valid")
});

/// A lesson as requested by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSpec {
    #[serde(default)]
    pub title: String,
    /// Start timestamp, `S`, `M:S` or `H:M:S`
    #[serde(default)]
    pub start: String,
    /// End timestamp, same forms as `start`
    #[serde(default)]
    pub end: String,
}

impl LessonSpec {
    pub fn new(title: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            end: end.into(),
        }
    }
}

/// A lesson that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLesson {
    /// Filesystem-safe title
    pub title: String,
    pub start: f64,
    pub end: f64,
    /// `end - start`, rounded to centiseconds
    pub duration: f64,
}

/// Strip everything outside `[A-Za-z0-9 _-]`, falling back to `DEFAULT_LESSON_TITLE`
pub fn sanitize_title(title: &str) -> String {
    let sanitized = UNSAFE_TITLE_CHARS.replace_all(title, "");
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        DEFAULT_LESSON_TITLE.to_string()
    } else {
        sanitized.to_string()
    }
}

/// Decode and order-check one lesson
pub fn validate(spec: &LessonSpec) -> Result<ValidatedLesson, ClipError> {
    if spec.start.trim().is_empty() {
        return Err(ClipError::invalid_timestamp(&spec.start, "start timestamp is missing"));
    }
    if spec.end.trim().is_empty() {
        return Err(ClipError::invalid_timestamp(&spec.end, "end timestamp is missing"));
    }

    let start = timecode::decode(&spec.start)?;
    let end = timecode::decode(&spec.end)?;
    if end <= start {
        return Err(ClipError::invalid_timestamp(
            &spec.end,
            format!("end must be after start ({})", spec.start.trim()),
        ));
    }

    Ok(ValidatedLesson {
        title: sanitize_title(&spec.title),
        start,
        end,
        duration: ((end - start) * 100.0).round() / 100.0,
    })
}

/// Validate a whole batch, reporting the first offending lesson
pub fn validate_all(specs: &[LessonSpec]) -> Result<Vec<ValidatedLesson>, ClipError> {
    if specs.is_empty() {
        return Err(ClipError::EmptyBatch);
    }

    specs
        .iter()
        .enumerate()
        .map(|(position, spec)| {
            validate(spec).map_err(|e| ClipError::ValidationAbort {
                lesson: position + 1,
                title: spec.title.clone(),
                source: Box::new(e),
            })
        })
        .collect()
}

/// Sequence number for the next lesson written into `destination`
pub fn next_sequence<P: AsRef<Path>>(destination: P) -> Result<u32, ClipError> {
    let destination = destination.as_ref();
    let existing = FileManager::count_clip_files(destination)? as u32;
    let highest = FileManager::highest_clip_sequence(destination)?;
    Ok(existing.max(highest) + 1)
}

/// Validates lesson batches and cuts them in fail-fast mode
#[derive(Debug)]
pub struct LessonSegmenter<'a> {
    tool: &'a dyn MediaTool,
}

impl<'a> LessonSegmenter<'a> {
    pub fn new(tool: &'a dyn MediaTool) -> Self {
        Self { tool }
    }

    /// Cut every lesson in `specs` from `source` into `destination`.
    ///
    /// Nothing is written when any spec is invalid. A failed cut stops the
    /// batch with `ClipError::LessonAborted`; lessons cut before it stay on disk.
    pub async fn segment(
        &self,
        source: &Path,
        specs: &[LessonSpec],
        destination: &Path,
    ) -> Result<Vec<ClipDescriptor>, ClipError> {
        let lessons = validate_all(specs)?;
        let first_sequence = next_sequence(destination)?;

        info!(
            "Cutting {} lesson(s) from {} starting at sequence {:02}",
            lessons.len(),
            source.display(),
            first_sequence
        );

        let windows: Vec<ClipWindow> = lessons
            .into_iter()
            .map(|lesson| ClipWindow::new(lesson.start, lesson.duration, lesson.title))
            .collect();

        let batch = ClipMaterializer::new(self.tool)
            .materialize(source, &windows, destination, MaterializeMode::Lesson { first_sequence })
            .await?;

        Ok(batch.clips)
    }
}
