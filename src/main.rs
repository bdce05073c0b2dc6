// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subminer::app_config::{self, Config, OutputFormat};
use subminer::app_controller::Controller;

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

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the subtitles shown at a timestamp
    At {
        /// Subtitle file (.srt or .ass)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Timestamp in the configured format (default mm:ss.cc)
        #[arg(value_name = "TIMESTAMP")]
        timestamp: String,
    },

    /// Match the lines of one track to the overlapping lines of another
    Align {
        /// Track to align from
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Track to find overlapping lines in
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Only align source lines shown at this timestamp
        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<String>,
    },

    /// Print every subtitle of a file
    Dump {
        /// Subtitle file (.srt or .ass)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Find and check subtitle files in a directory
    Scan {
        /// Directory to search recursively
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Generate shell completions for subminer
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subminer - subtitle timing engine
///
/// Loads SRT and ASS subtitle tracks and answers time queries against them.
#[derive(Parser, Debug)]
#[command(name = "subminer")]
#[command(version)]
#[command(about = "Subtitle timing lookups and cross-track alignment")]
#[command(long_about = "subminer loads SRT and ASS subtitle tracks and finds the lines shown at a moment or overlapping another line.

EXAMPLES:
    subminer at episode.ja.ass 07:54.32               # Lines shown at 7:54.32
    subminer align episode.ja.ass episode.en.srt      # Pair every line with its translation
    subminer align ja.ass en.srt --at 07:54.32        # Only pair lines shown at 7:54.32
    subminer --format json dump episode.en.srt        # Whole track as JSON
    subminer scan ~/anime                             # Check every subtitle file in a folder
    subminer completions bash > subminer.bash         # Generate bash completions

CONFIGURATION:
    Settings are read from subminer.json by default. You can specify a different
    config file with --config-path. Missing files fall back to defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "subminer.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true)]
    format: Option<CliOutputFormat>,

    /// Maximum matches printed per query (0 for all)
    #[arg(short, long, global = true)]
    max_results: Option<usize>,

    /// Accept ASS files with zero or several [Events] sections
    #[arg(long, global = true)]
    lenient: bool,
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

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Install with the most verbose filter; log::set_max_level narrows it below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subminer", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());
    debug!("Running with config: {:?}", config);

    let controller = Controller::with_config(config)?;
    let output = match &cli.command {
        Commands::At { file, timestamp } => {
            let events = controller.lookup(file, timestamp)?;
            controller.render_events(&events)?
        }
        Commands::Align { source, target, at } => {
            let alignments = controller.align(source, target, at.as_deref())?;
            controller.render_alignments(&alignments)?
        }
        Commands::Dump { file } => {
            let track = controller.dump(file)?;
            controller.render_track(&track)?
        }
        Commands::Scan { dir } => {
            let entries = controller.scan(dir)?;
            controller.render_scan(&entries)?
        }
        Commands::Completions { .. } => return Ok(()),
    };

    let mut stdout = std::io::stdout();
    stdout.write_all(output.as_bytes()).context("Failed to write results")?;
    if !output.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config_path)
        .with_context(|| format!("Failed to load config from {:?}", cli.config_path))?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(format) = &cli.format {
        config.output = format.clone().into();
    }
    if let Some(max_results) = cli.max_results {
        config.max_results = max_results;
    }
    if cli.lenient {
        config.strict_ass = false;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
