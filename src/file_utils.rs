use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::ClipError;
use crate::media::{self, CLIP_EXTENSIONS, SOURCE_EXTENSIONS};

// @module: File and directory utilities

// @const: Leading `NN - ` sequence of a numbered clip name
static SEQUENCE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+) - ").expect("sequence prefix regex is valid")
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), ClipError> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .map_err(|e| ClipError::io(format!("Failed to create directory {}", path.display()), e))?;
        }
        Ok(())
    }

    /// Check that a path is an existing file with a supported container extension
    pub fn require_source_media<P: AsRef<Path>>(path: P) -> Result<(), ClipError> {
        let path = path.as_ref();
        if !path.is_file() || !media::has_extension(path, SOURCE_EXTENSIONS) {
            return Err(ClipError::UnsupportedMedia {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Count media files directly inside `dir` (not recursive).
    ///
    /// A missing directory counts as empty.
    pub fn count_clip_files<P: AsRef<Path>>(dir: P) -> Result<usize, ClipError> {
        Ok(Self::clip_file_names(dir.as_ref())?.len())
    }

    /// Highest `NN - ` prefix among media files directly inside `dir`, 0 when none
    pub fn highest_clip_sequence<P: AsRef<Path>>(dir: P) -> Result<u32, ClipError> {
        let highest = Self::clip_file_names(dir.as_ref())?
            .iter()
            .filter_map(|name| SEQUENCE_PREFIX_REGEX.captures(name))
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(highest)
    }

    // @returns: Names of media files directly inside a directory
    fn clip_file_names(dir: &Path) -> Result<Vec<String>, ClipError> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                ClipError::io(format!("Failed to read directory {}", dir.display()), e.into())
            })?;
            if entry.file_type().is_file() && media::has_extension(entry.path(), CLIP_EXTENSIONS) {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(names)
    }

    /// Locate the caption track stored next to a video.
    ///
    /// Tries `<stem>.<lang>.vtt` for each language in order, then `<stem>.vtt`.
    pub fn find_caption_for_video<P: AsRef<Path>, S: AsRef<str>>(video: P, languages: &[S]) -> Option<PathBuf> {
        let video = video.as_ref();
        let stem = video.file_stem()?.to_string_lossy().to_string();
        let parent = video.parent().unwrap_or_else(|| Path::new(""));

        languages
            .iter()
            .map(|lang| parent.join(format!("{}.{}.vtt", stem, lang.as_ref())))
            .chain(std::iter::once(parent.join(format!("{}.vtt", stem))))
            .find(|candidate| candidate.is_file())
    }

    /// Extension of a source file, lower-cased, or `fallback` when it has none
    pub fn extension_or<P: AsRef<Path>>(path: P, fallback: &str) -> String {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
