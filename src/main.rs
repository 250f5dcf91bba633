// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::MultiProgress;
use log::{debug, error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use subwhisper::app_config::{self, Config, RunOverrides};
use subwhisper::progress::IndicatifProgress;
use subwhisper::{AppError, Controller};

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
    /// Transcribe every MP4 file in a folder into SRT and VTT subtitles
    Run(RunArgs),

    /// Generate shell completions for subwhisper
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Folder containing the videos (not searched recursively)
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// WebVTT cue width in percent, written as `size:<PERCENT>%`
    #[arg(short, long, value_name = "PERCENT", value_parser = clap::value_parser!(u32).range(1..=100))]
    width: Option<u32>,

    /// Re-transcribe files even if both subtitle files exist
    #[arg(short, long)]
    force: bool,

    /// Spoken language hint (e.g., 'en', 'fra'); auto-detected when omitted
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Transcription model name
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the transcription service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// subwhisper - batch subtitles from video with Whisper
///
/// Converts each MP4 file in a folder to audio, transcribes it, and writes
/// `.srt` and `.vtt` files next to the video.
#[derive(Parser, Debug)]
#[command(name = "subwhisper")]
#[command(version)]
#[command(about = "Batch subtitle generation from MP4 videos")]
#[command(long_about = "subwhisper extracts the audio of every MP4 file in a folder, transcribes it with the
OpenAI transcription API and writes SRT and WebVTT subtitles alongside each video.

EXAMPLES:
    subwhisper run ./lectures                  # Transcribe every MP4 in ./lectures
    subwhisper run ./lectures --width=80       # Add size:80% to every VTT cue
    subwhisper run -f -L de ./talks            # Redo existing files, German hint
    subwhisper completions bash > subwhisper.bash

Files whose .srt and .vtt already exist are skipped.
The API key is read from OPENAI_API_KEY (a .env file in the working directory is honoured).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", value_name = "FILE", global = true)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
    // @field: Bars are cleared while a line is written, then redrawn
    multi_progress: MultiProgress,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter, multi_progress: MultiProgress) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace, multi_progress }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => "",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            self.multi_progress.suspend(|| {
                let mut stderr = std::io::stderr();
                let _ = writeln!(
                    stderr,
                    "\x1B[{}m{} {} {}\x1B[0m",
                    Self::get_color_for_level(record.level()),
                    now,
                    Self::get_emoji_for_level(record.level()),
                    record.args()
                );
            });
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let multi_progress = MultiProgress::new();
    if let Err(e) = CustomLogger::init(LevelFilter::Info, multi_progress.clone()) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if e.use_stderr() {
                return ExitCode::from(AppError::Usage(e.to_string()).exit_code());
            }
            return ExitCode::SUCCESS;
        }
    };

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subwhisper", &mut std::io::stdout());
            Ok(())
        }
        Commands::Run(args) => {
            let progress = IndicatifProgress::with_multi_progress(multi_progress);
            run_transcribe(args, cli.config_path, cli.log_level.is_some(), progress).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run_transcribe(args: RunArgs, config_path: Option<PathBuf>, log_level_from_cli: bool, progress: IndicatifProgress) -> Result<(), AppError> {
    let overrides = RunOverrides {
        api_key: args.api_key,
        model: args.model,
        language: args.language,
        vtt_width: args.width,
    };
    let config = Config::prepare_run(&args.directory, config_path.as_deref(), overrides)?;

    if !log_level_from_cli {
        log::set_max_level(config.log_level.to_level_filter());
    }
    debug!("Using model {} at {}", config.transcription.model, config.transcription.endpoint);

    let controller = Controller::with_config(config).force_overwrite(args.force);
    controller.run_folder(&args.directory, &progress).await?;

    Ok(())
}
