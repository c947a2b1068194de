// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use samiconv::app_config::{self, Config};
use samiconv::app_controller::Controller;
use samiconv::writers::OutputFormat;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    #[value(alias = "vtt")]
    Webvtt,
    #[value(alias = "subrip")]
    Srt,
    #[value(alias = "dfxp")]
    Ttml,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Webvtt => OutputFormat::WebVtt,
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Ttml => OutputFormat::Ttml,
        }
    }
}

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
    /// Convert SAMI subtitles (default command)
    #[command(alias = "conv")]
    Convert(ConvertArgs),

    /// Generate shell completions for samiconv
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input SAMI file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: ConvertOptions,
}

#[derive(clap::Args, Debug, Clone)]
struct ConvertOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Output format
    #[arg(short = 't', long = "format", value_enum)]
    output_format: Option<CliOutputFormat>,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Shift every cue by this many milliseconds, may be negative
    #[arg(short, long, allow_hyphen_values = true)]
    delay: Option<i64>,

    /// Write one output file per declared language
    #[arg(short, long = "split-languages")]
    split: bool,

    /// Only write the language matching this code (e.g. 'ko', 'en-US')
    #[arg(short, long)]
    language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// samiconv - SAMI subtitle converter
///
/// Converts SAMI (.smi) subtitles to WebVTT, SubRip or TTML, repairing
/// broken ruby annotations and splitting multilingual files.
#[derive(Parser, Debug)]
#[command(name = "samiconv")]
#[command(version)]
#[command(about = "SAMI to WebVTT/SubRip/TTML subtitle converter")]
#[command(long_about = "samiconv converts SAMI subtitles into WebVTT, SubRip or TTML.

EXAMPLES:
    samiconv movie.smi                          # Convert to WebVTT next to the input
    samiconv -t srt movie.smi                   # Convert to SubRip
    samiconv -s movie.smi                       # One file per language (movie.ko.vtt, ...)
    samiconv -l en -d -1500 movie.smi           # English only, 1.5 seconds earlier
    samiconv -o out/ --log-level debug /subs/   # Process entire directory
    samiconv completions bash > samiconv.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SAMI file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: ConvertOptions,
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

    // @returns: ANSI colour and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "samiconv", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_convert(ConvertArgs {
                input_path,
                options: cli.options,
            })
            .await
        }
    }
}

fn apply_overrides(config: &mut Config, options: &ConvertOptions) {
    if let Some(format) = &options.output_format {
        config.output_format = format.clone().into();
    }
    if let Some(delay) = options.delay {
        config.conversion.delay_ms = delay;
    }
    if options.split {
        config.conversion.split_languages = true;
    }
    if let Some(language) = &options.language {
        config.conversion.language = Some(language.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_convert(args: ConvertArgs) -> Result<()> {
    let options = &args.options;

    // Apply a command line log level before anything gets logged
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level((&level).into());
    }

    // Load or create configuration
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            options.config_path
        );
        let config = Config::default();
        config.save(config_path)?;
        config
    };
    apply_overrides(&mut config, options);

    // Validates too
    let controller = Controller::with_config(config)?;
    log::set_max_level((&controller.config().log_level).into());

    if args.input_path.is_file() {
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            args.input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf()
        });
        controller
            .run(args.input_path.clone(), output_dir, options.force_overwrite)
            .await?;
    } else if args.input_path.is_dir() {
        let summary = controller
            .run_folder(
                args.input_path.clone(),
                options.output_dir.clone(),
                options.force_overwrite,
            )
            .await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    }

    Ok(())
}
