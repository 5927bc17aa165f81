/*!
 * Error types for the reelcut engine.
 *
 * Library components return `ClipError`; the application layer wraps it in
 * `anyhow` with additional context. Parsing and detection never fail: a
 * malformed caption block is skipped and an empty candidate list is a valid
 * outcome, so neither has a variant here.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by timestamp decoding, lesson validation and clip cutting
#[derive(Error, Debug)]
pub enum ClipError {
    /// A caller-supplied timestamp could not be decoded or is out of order
    #[error("Invalid timestamp '{text}': {reason}")]
    InvalidTimestamp {
        /// The offending text as supplied
        text: String,
        /// Why it was rejected
        reason: String,
    },

    /// The cut or probe process failed or could not be started
    #[error("External tool failed for {context}: {diagnostics}")]
    ExternalToolFailure {
        /// Identifies the window, clip or file being processed
        context: String,
        /// Filtered stderr or spawn error
        diagnostics: String,
    },

    /// A lesson batch was rejected before anything was written
    #[error("Lesson {lesson} (\"{title}\") rejected: {source}")]
    ValidationAbort {
        /// 1-based position of the lesson in the request
        lesson: usize,
        /// Title as supplied by the caller
        title: String,
        #[source]
        source: Box<ClipError>,
    },

    /// A lesson batch contained no lessons
    #[error("No lessons were supplied")]
    EmptyBatch,

    /// A lesson cut failed mid-batch; earlier lessons remain on disk
    #[error("Lesson {sequence:02} (\"{title}\") failed after {completed} created: {source}")]
    LessonAborted {
        /// Sequence number the failed lesson would have received
        sequence: u32,
        /// Sanitized title of the failed lesson
        title: String,
        /// Number of lessons written before the failure
        completed: usize,
        #[source]
        source: Box<ClipError>,
    },

    /// Source file does not carry a supported container extension
    #[error("Unsupported media file: {}", path.display())]
    UnsupportedMedia {
        path: PathBuf,
    },

    /// A lesson file with the same name is already in the destination
    #[error("Refusing to overwrite existing file: {}", path.display())]
    OutputExists {
        path: PathBuf,
    },

    /// Filesystem error while preparing or scanning a destination
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClipError {
    /// Build an `InvalidTimestamp` error
    pub fn invalid_timestamp(text: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    /// Build an `ExternalToolFailure` error
    pub fn tool_failure(context: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::ExternalToolFailure {
            context: context.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Build an `Io` error with a short description of what was attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Innermost error of a wrapped validation or lesson failure
    pub fn root_cause(&self) -> &ClipError {
        match self {
            Self::ValidationAbort { source, .. } | Self::LessonAborted { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}
