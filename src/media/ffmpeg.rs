use async_trait::async_trait;
use log::{debug, error};
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::ClipConfig;
use crate::errors::ClipError;
use crate::media::{CutRequest, MediaTool};

// @module: ffmpeg/ffprobe backed media tool

/// Runs `ffmpeg` stream-copy cuts and `ffprobe` duration queries
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg_path: String,
    ffprobe_path: String,
    timeout: Option<Duration>,
}

impl Ffmpeg {
    /// Use the given executables, with no time limit
    pub fn new(ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            timeout: None,
        }
    }

    /// Build from the clip section of the configuration
    pub fn from_config(config: &ClipConfig) -> Self {
        let tool = Self::new(&config.ffmpeg_path, &config.ffprobe_path);
        match config.cut_timeout_secs {
            Some(secs) if secs > 0 => tool.with_timeout(Duration::from_secs(secs)),
            _ => tool,
        }
    }

    /// Abort any single invocation that runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Arguments for a stream-copy cut; `-avoid_negative_ts make_zero` rebases
    /// the output timestamps to zero.
    pub fn cut_args(request: &CutRequest) -> Vec<String> {
        vec![
            "-ss".to_string(),
            format!("{:.3}", request.start),
            "-i".to_string(),
            request.source.to_string_lossy().to_string(),
            "-t".to_string(),
            format!("{:.3}", request.duration),
            "-c".to_string(),
            "copy".to_string(),
            "-avoid_negative_ts".to_string(),
            "make_zero".to_string(),
            "-y".to_string(),
            request.output.to_string_lossy().to_string(),
        ]
    }

    async fn run(&self, program: &str, args: &[String], context: &str) -> Result<Output, ClipError> {
        let child = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output();

        let result = match self.timeout {
            Some(limit) => tokio::select! {
                result = child => result,
                _ = tokio::time::sleep(limit) => {
                    return Err(ClipError::tool_failure(
                        context,
                        format!("{} timed out after {} seconds", program, limit.as_secs()),
                    ));
                }
            },
            None => child.await,
        };

        result.map_err(|e| ClipError::tool_failure(context, format!("failed to execute {}: {}", program, e)))
    }

    /// Filter ffmpeg stderr down to the lines that explain a failure, stripping the
    /// version banner, build configuration and stream metadata noise.
    ///
    /// Banner lines start at column zero; build and stream details are indented
    /// under them, so indented prefixes only match inside those blocks.
    pub fn filter_stderr(stderr: &str) -> String {
        let banner_prefixes = [
            "ffmpeg version",
            "ffprobe version",
            "Input #",
            "Output #",
            "Stream mapping:",
            "Press [q]",
        ];
        let block_prefixes = [
            "built with",
            "configuration:",
            "lib",
            "Metadata:",
            "Duration:",
            "Chapter",
            "Stream #",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !banner_prefixes.iter().any(|prefix| line.starts_with(prefix)))
            .filter(|line| {
                let indented = line.starts_with(char::is_whitespace);
                let trimmed = line.trim();
                // Metadata entries look like `    major_brand     : isom`
                !(indented
                    && (block_prefixes.iter().any(|prefix| trimmed.starts_with(prefix))
                        || trimmed.contains(" : ")
                        || trimmed.ends_with(" :")))
            })
            .map(str::trim)
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

#[async_trait]
impl MediaTool for Ffmpeg {
    async fn cut(&self, request: &CutRequest) -> Result<(), ClipError> {
        let context = format!("cut of {}", request.output.display());
        let args = Self::cut_args(request);
        debug!("{} {}", self.ffmpeg_path, args.join(" "));

        let output = self.run(&self.ffmpeg_path, &args, &context).await?;
        if !output.status.success() {
            let filtered = Self::filter_stderr(&String::from_utf8_lossy(&output.stderr));
            error!("ffmpeg failed for {}: {}", request.output.display(), filtered);
            return Err(ClipError::tool_failure(context, filtered));
        }

        Ok(())
    }

    async fn probe_duration(&self, source: &Path) -> Result<f64, ClipError> {
        let context = format!("probe of {}", source.display());
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            source.to_string_lossy().to_string(),
        ];

        let output = self.run(&self.ffprobe_path, &args, &context).await?;
        if !output.status.success() {
            let filtered = Self::filter_stderr(&String::from_utf8_lossy(&output.stderr));
            return Err(ClipError::tool_failure(context, filtered));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = stdout
            .trim()
            .parse::<f64>()
            .map_err(|_| ClipError::tool_failure(&context, format!("unexpected ffprobe output: '{}'", stdout.trim())))?;

        Ok((duration * 100.0).round() / 100.0)
    }
}
