use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

// @module: Caption track parsing

// @const: Cue header regex, `HH:MM:SS.mmm --> HH:MM:SS.mmm` with optional trailing cue settings
static CUE_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,}):(\d{2}):(\d{2})[.,](\d{3})\s*-->\s*(\d{1,}):(\d{2}):(\d{2})[.,](\d{3})")
        .expect("cue header regex is valid")
});

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    // @field: Start in seconds
    pub start: f64,

    // @field: End in seconds, always greater than start
    pub end: f64,

    // @field: Caption text, lines joined with a space
    pub text: String,
}

impl CaptionSegment {
    /// Creates a new caption segment
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the caption in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

// @struct: Cue being accumulated while scanning lines
struct PendingCue {
    start: f64,
    end: f64,
    lines: Vec<String>,
}

impl PendingCue {
    fn finish(self) -> CaptionSegment {
        CaptionSegment::new(self.start, self.end, self.lines.join(" "))
    }
}

/// Parse a caption file from disk
pub fn parse_caption_file<P: AsRef<Path>>(path: P) -> Result<Vec<CaptionSegment>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read caption file: {}", path.display()))?;
    Ok(parse_captions(&content))
}

/// Parse timed text into an ordered list of caption segments.
///
/// Blocks are separated by blank lines and start with a cue header; every
/// following non-blank line up to the next blank line or header is caption
/// text. Blocks without a usable header (file preambles, `NOTE` blocks, stray
/// text, headers whose end does not follow their start) are skipped. A header
/// with no text still yields a segment with empty text.
pub fn parse_captions(content: &str) -> Vec<CaptionSegment> {
    let content = content.trim_start_matches('\u{feff}');

    let mut segments = Vec::new();
    let mut pending: Option<PendingCue> = None;
    let mut skipped_lines = 0usize;

    for (line_number, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if let Some(cue) = pending.take() {
                segments.push(cue.finish());
            }
            continue;
        }

        if let Some(caps) = CUE_HEADER_REGEX.captures(trimmed) {
            if let Some(cue) = pending.take() {
                segments.push(cue.finish());
            }

            let start = header_seconds(&caps, 1);
            let end = header_seconds(&caps, 5);
            if end > start {
                pending = Some(PendingCue {
                    start,
                    end,
                    lines: Vec::new(),
                });
            } else {
                debug!("Skipping cue at line {}: end {:.3} does not follow start {:.3}", line_number + 1, end, start);
                skipped_lines += 1;
            }
            continue;
        }

        match pending.as_mut() {
            Some(cue) => cue.lines.push(trimmed.to_string()),
            None => skipped_lines += 1,
        }
    }

    if let Some(cue) = pending.take() {
        segments.push(cue.finish());
    }

    if skipped_lines > 0 {
        debug!("Ignored {} line(s) outside of valid cues", skipped_lines);
    }

    segments
}

// Components are at most a few digits each, matched by \d in the regex
fn header_seconds(caps: &Captures, first_group: usize) -> f64 {
    let field = |offset: usize| -> f64 {
        caps.get(first_group + offset)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    field(0) * 3600.0 + field(1) * 60.0 + field(2) + field(3) / 1000.0
}
