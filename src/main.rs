// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};

use lingoshot::app_config::{Config, LogLevel};
use lingoshot::capture::{FileCaptureSource, Region};
use lingoshot::database::HistoryRepository;
use lingoshot::language::{Language, LanguageHint};
use lingoshot::ocr::OcrEngine;
use lingoshot::pipeline::{PipelineOrchestrator, PipelineOutcome, PipelineRequest};
use lingoshot::providers::ProviderRegistry;
use lingoshot::translation::TranslationService;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recognize and translate text from an image file
    Image(ImageArgs),

    /// Translate text directly, without OCR
    Text(TextArgs),

    /// Browse or prune the translation history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Image file to recognize
    image_path: std::path::PathBuf,

    /// Crop region as x1,y1,x2,y2 before recognition
    #[arg(long)]
    region: Option<String>,

    /// OCR language: en, ru, ja, or auto
    #[arg(long)]
    ocr_lang: Option<String>,

    /// Target language code
    #[arg(short, long)]
    to: Option<String>,

    /// Translation provider to use
    #[arg(short, long)]
    provider: Option<String>,
}

#[derive(Args, Debug)]
struct TextArgs {
    /// Text to translate
    text: String,

    /// Source language code
    #[arg(short, long)]
    from: String,

    /// Target language code
    #[arg(short, long)]
    to: Option<String>,

    /// Translation provider to use
    #[arg(short, long)]
    provider: Option<String>,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Show the most recent translations
    List {
        /// Maximum number of records to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Delete specific records by id
    Delete {
        /// Record ids to delete
        ids: Vec<i64>,
    },

    /// Delete the entire history
    Clear,
}

/// lingoshot - screen text recognition and translation
///
/// Recognizes text in images with Tesseract OCR and translates it between
/// English, Russian, and Japanese using OpenAI-compatible LLM providers.
#[derive(Parser, Debug)]
#[command(name = "lingoshot")]
#[command(version)]
#[command(about = "OCR capture and LLM translation tool")]
#[command(long_about = "lingoshot recognizes text in images and translates it with LLM providers.

EXAMPLES:
    lingoshot image screenshot.png --to ru          # Recognize and translate an image
    lingoshot image shot.png --region 10,10,400,200 # Only recognize a sub-rectangle
    lingoshot text \"Hello\" --from en --to ja        # Translate text directly
    lingoshot history list --limit 20               # Show recent translations
    lingoshot history delete 3 7                    # Delete selected records
    lingoshot history clear                         # Clear the history

CONFIGURATION:
    Configuration is stored in lingoshot.json by default. You can specify a
    different file with --config-path. If the config file doesn't exist, a
    default one will be created automatically. Set provider API keys there
    before translating.

SUPPORTED PROVIDERS:
    openai   - OpenAI API (requires API key)
    deepseek - DeepSeek API (requires API key)
    Any OpenAI-compatible endpoint can be added to the providers list.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "lingoshot.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let config_path = cli.config_path.clone();
    if !Path::new(&config_path).exists() {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
    }
    let mut config = Config::load_or_create(&config_path)?;

    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config
        .validate()
        .context("Configuration validation failed")?;

    match cli.command {
        Commands::Image(args) => run_image(&config, args).await,
        Commands::Text(args) => run_text(&config, args).await,
        Commands::History { action } => run_history(action).await,
    }
}

fn build_translation_service(config: &Config) -> Result<Arc<TranslationService>> {
    let repository = HistoryRepository::new_default()?;
    let registry = ProviderRegistry::from_configs(&config.providers);
    Ok(Arc::new(TranslationService::new(
        registry,
        repository,
        config.default_provider.clone(),
    )))
}

fn resolve_target(config: &Config, to: Option<&str>) -> Result<Language> {
    let code = to.unwrap_or(&config.target_language);
    code.parse()
}

async fn run_image(config: &Config, args: ImageArgs) -> Result<()> {
    let service = build_translation_service(config)?;

    let engine = match &config.ocr.tesseract_path {
        Some(path) => OcrEngine::with_executable(path),
        None => OcrEngine::new(),
    };

    let ocr_language: LanguageHint = match &args.ocr_lang {
        Some(code) => code.parse()?,
        None => config.ocr.language.parse()?,
    };
    let target_language = resolve_target(config, args.to.as_deref())?;
    let crop = match &args.region {
        Some(raw) => Some(raw.parse::<Region>()?.to_crop_rect()),
        None => None,
    };

    let orchestrator = PipelineOrchestrator::new(engine, service);
    let request = PipelineRequest {
        source: Arc::new(FileCaptureSource::new(&args.image_path)),
        crop,
        ocr_language,
        target_language,
        provider: args.provider,
    };

    match orchestrator.run(request).await {
        Ok(PipelineOutcome::Translated {
            original,
            translated,
            source_language,
        }) => {
            println!("Recognized ({}):", source_language);
            println!("{}", original);
            println!();
            println!("Translation ({}):", target_language);
            println!("{}", translated);
            Ok(())
        }
        Ok(PipelineOutcome::NoTextDetected) => {
            println!("No text detected in the image.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_text(config: &Config, args: TextArgs) -> Result<()> {
    let service = build_translation_service(config)?;

    let source: Language = args.from.parse()?;
    let target = resolve_target(config, args.to.as_deref())?;

    let translated = service
        .translate(&args.text, source, target, args.provider.as_deref())
        .await?;
    println!("{}", translated);
    Ok(())
}

async fn run_history(action: HistoryAction) -> Result<()> {
    let repository = HistoryRepository::new_default()?;

    match action {
        HistoryAction::List { limit } => {
            let records = repository.list_recent(limit).await?;
            if records.is_empty() {
                println!("History is empty.");
                return Ok(());
            }
            for record in records {
                println!(
                    "[{}] {} {}->{} via {}: {} => {}",
                    record.id,
                    record.created_at,
                    record.source_lang,
                    record.target_lang,
                    record.provider,
                    record.source_text,
                    record.target_text
                );
            }
            Ok(())
        }
        HistoryAction::Delete { ids } => {
            let deleted = repository.delete(&ids).await?;
            println!("Deleted {} record(s).", deleted);
            Ok(())
        }
        HistoryAction::Clear => {
            let deleted = repository.delete_all().await?;
            println!("Cleared history ({} record(s)).", deleted);
            Ok(())
        }
    }
}
