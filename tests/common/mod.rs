/*!
 * Common test utilities for the reelcut test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use reelcut::CaptionSegment;

/// Caption track whose first two cues form one five second highlight
pub const SAMPLE_CAPTIONS: &str = "WEBVTT
Kind: captions
Language: pt

00:00:00.000 --> 00:00:02.000
dica incrível de hoje

00:00:02.000 --> 00:00:05.000
voce sabia que isso funciona?

00:00:05.000 --> 00:00:20.000
texto comum sem palavras chave
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent folders as needed
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a placeholder video and its `<stem>.pt.vtt` caption track
pub fn create_captioned_video(dir: &Path, filename: &str, captions: &str) -> Result<PathBuf> {
    let video = create_test_file(dir, filename, "not really a video")?;
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    create_test_file(dir, &format!("{}.pt.vtt", stem), captions)?;
    Ok(video)
}

/// Same cues as `SAMPLE_CAPTIONS`, already parsed
pub fn sample_segments() -> Vec<CaptionSegment> {
    vec![
        CaptionSegment::new(0.0, 2.0, "dica incrível de hoje"),
        CaptionSegment::new(2.0, 5.0, "voce sabia que isso funciona?"),
        CaptionSegment::new(5.0, 20.0, "texto comum sem palavras chave"),
    ]
}

/// Sorted file names directly inside `dir`
pub fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}
