/*!
 * # lingoshot
 *
 * A Rust library for recognizing text in captured images and translating
 * it between English, Russian, and Japanese with LLM providers.
 *
 * ## Features
 *
 * - Deterministic image preprocessing tuned for OCR
 * - Tesseract-backed recognition with language auto-detection
 * - Cache-first translation dispatch over OpenAI-compatible providers
 * - Durable translation history in a local SQLite database
 * - Task-per-request pipeline execution with channel result delivery
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `capture`: Capture source contract and file import
 * - `preprocess`: Image normalization before recognition
 * - `ocr`: OCR engine and tesseract backend
 * - `database`: Translation history persistence:
 *   - `database::connection`: SQLite connection management
 *   - `database::repository`: History operations
 * - `providers`: OpenAI-compatible chat-completion plumbing
 * - `translation`: Cache-first translation dispatch
 * - `pipeline`: Capture-and-translate orchestration
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod capture;
pub mod database;
pub mod errors;
pub mod language;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use capture::{CaptureSource, FileCaptureSource, Region};
pub use database::{HistoryRepository, TranslationRecord};
pub use errors::{AppError, CaptureError, OcrError, ProviderError, TranslationError};
pub use language::{Language, LanguageHint};
pub use ocr::{OcrEngine, RecognizedText};
pub use pipeline::{PipelineOrchestrator, PipelineOutcome, PipelineRunner};
pub use translation::TranslationService;
