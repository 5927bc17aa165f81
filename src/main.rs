// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use reelcut::app_config::{self, Config};
use reelcut::lesson_segmenter::LessonSpec;
use reelcut::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect highlights in the video's captions and cut them into `<stem>_reels/`
    Reels {
        /// Source video (mp4, webm, mkv or m4a) with a `.vtt` caption file beside it
        #[arg(value_name = "VIDEO")]
        video: PathBuf,

        /// Shortest highlight to keep, in seconds
        #[arg(long)]
        min_duration: Option<f64>,

        /// Longest highlight to keep, in seconds
        #[arg(long)]
        max_duration: Option<f64>,
    },

    /// Cut named lessons listed in a JSON file into the lessons folder
    Lessons {
        /// Source video
        #[arg(value_name = "VIDEO")]
        video: PathBuf,

        /// JSON array of {"title", "start", "end"} objects
        #[arg(value_name = "LESSONS_JSON")]
        lessons: PathBuf,
    },

    /// Print the caption timeline of a video
    Timeline {
        /// Source video
        #[arg(value_name = "VIDEO")]
        video: PathBuf,
    },

    /// Generate shell completions for reelcut
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// reelcut - caption-driven highlight and lesson clipping
///
/// Reads the caption track stored next to a video, ranks the most engaging
/// stretches, and cuts them (or explicit lesson ranges) with ffmpeg stream copy.
#[derive(Parser, Debug)]
#[command(name = "reelcut")]
#[command(version)]
#[command(about = "Cut highlight reels and lessons from captioned videos")]
#[command(long_about = "reelcut cuts highlight reels and lessons out of captioned videos without re-encoding.

EXAMPLES:
    reelcut reels talk.mp4                          # Highlights between 15s and 60s
    reelcut reels talk.mp4 --min-duration 20        # Override the shortest highlight
    reelcut lessons course.mkv lessons.json         # Cut the lessons listed in lessons.json
    reelcut timeline course.mkv                     # Show captions with timestamps
    reelcut completions bash > reelcut.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌"),
            Level::Warn => ("1;33", "🚧"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍"),
            Level::Trace => ("1;35", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start verbose enough for config warnings; narrowed once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "reelcut", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match &cli.command {
        Commands::Reels { video, min_duration, max_duration } => {
            let report = controller.create_reels(video, *min_duration, *max_duration).await?;
            print_json(&report)
        }
        Commands::Lessons { video, lessons } => {
            let specs = load_lessons(lessons)?;
            let report = controller.create_lessons(video, &specs).await?;
            print_json(&report)
        }
        Commands::Timeline { video } => {
            let timeline = controller.timeline(video).await?;
            print_json(&timeline)
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// Load the configuration, writing defaults when the file does not exist yet
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        return Ok(config);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    let config_json = serde_json::to_string_pretty(&config)
        .context("Failed to serialize default config to JSON")?;
    std::fs::write(config_path, config_json)
        .with_context(|| format!("Failed to write default config to file: {}", config_path))?;

    Ok(config)
}

fn load_lessons(path: &Path) -> Result<Vec<LessonSpec>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open lessons file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse lessons file: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
