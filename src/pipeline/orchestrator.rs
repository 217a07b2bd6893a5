/*!
 * Pipeline orchestrator for one capture-and-translate run.
 *
 * Stages execute strictly in order: capture, preprocess, recognize,
 * translate. A failure at any stage terminates the run with the stage
 * name and the underlying typed error; there are no partial results and
 * nothing is retried. Empty recognized text completes the run with an
 * explicit no-text outcome instead of calling the translator.
 */

use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::capture::CaptureSource;
use crate::errors::AppError;
use crate::language::{Language, LanguageHint};
use crate::ocr::OcrEngine;
use crate::preprocess::{self, CropRect};
use crate::translation::TranslationService;

/// Stages of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Obtaining the image from the capture source
    Capturing,
    /// Normalizing the image for recognition
    Preprocessing,
    /// Running OCR
    Recognizing,
    /// Calling the translation provider
    Translating,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Capturing => "Capturing",
            Self::Preprocessing => "Preprocessing",
            Self::Recognizing => "Recognizing",
            Self::Translating => "Translating",
        };
        write!(f, "{}", name)
    }
}

/// One capture-and-translate request.
///
/// All settings are resolved when the request is built; an in-flight run
/// never observes configuration changes.
pub struct PipelineRequest {
    /// Where the image comes from
    pub source: Arc<dyn CaptureSource>,
    /// Optional sub-rectangle to recognize
    pub crop: Option<CropRect>,
    /// Recognition language, or auto-detection
    pub ocr_language: LanguageHint,
    /// Language to translate into
    pub target_language: Language,
    /// Provider override; None uses the service default
    pub provider: Option<String>,
}

/// Outcome of a completed (non-failed) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Text was recognized and translated
    Translated {
        /// Recognized source text
        original: String,
        /// Translated text
        translated: String,
        /// Language the text was recognized under
        source_language: Language,
    },
    /// Recognition found no text; translation was skipped
    NoTextDetected,
}

/// A failed run, tagged with the stage that failed
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// The stage that failed
    pub stage: PipelineStage,
    /// The underlying error
    #[source]
    pub source: AppError,
}

/// Callback invoked as each stage starts
pub type StageCallback = Box<dyn Fn(PipelineStage) + Send + Sync>;

/// Executes pipeline runs against an OCR engine and a translation service
pub struct PipelineOrchestrator {
    ocr: Arc<OcrEngine>,
    translator: Arc<TranslationService>,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator
    pub fn new(ocr: OcrEngine, translator: Arc<TranslationService>) -> Self {
        Self {
            ocr: Arc::new(ocr),
            translator,
        }
    }

    /// Run one request to completion or failure
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutcome, PipelineError> {
        self.execute(Uuid::new_v4(), request, None).await
    }

    /// Run one request, reporting each stage as it starts
    pub async fn run_with_progress(
        &self,
        request: PipelineRequest,
        progress: Option<StageCallback>,
    ) -> Result<PipelineOutcome, PipelineError> {
        self.execute(Uuid::new_v4(), request, progress).await
    }

    pub(crate) async fn execute(
        &self,
        run_id: Uuid,
        request: PipelineRequest,
        progress: Option<StageCallback>,
    ) -> Result<PipelineOutcome, PipelineError> {
        info!("Pipeline run {} started", run_id);

        // Stage 1: capture
        notify(&progress, PipelineStage::Capturing);
        let source = request.source.clone();
        let image = tokio::task::spawn_blocking(move || source.capture())
            .await
            .map_err(|e| stage_panic(PipelineStage::Capturing, e))?
            .map_err(|e| PipelineError {
                stage: PipelineStage::Capturing,
                source: AppError::Capture(e),
            })?;
        debug!(
            "Pipeline run {}: captured {}x{} image",
            run_id,
            image.width(),
            image.height()
        );

        // Stage 2: preprocess
        notify(&progress, PipelineStage::Preprocessing);
        let crop = request.crop;
        let prepared = tokio::task::spawn_blocking(move || preprocess::preprocess(&image, crop))
            .await
            .map_err(|e| stage_panic(PipelineStage::Preprocessing, e))?;

        // Stage 3: recognize
        notify(&progress, PipelineStage::Recognizing);
        let ocr = self.ocr.clone();
        let hint = request.ocr_language;
        let recognized = tokio::task::spawn_blocking(move || ocr.recognize_prepared(&prepared, hint))
            .await
            .map_err(|e| stage_panic(PipelineStage::Recognizing, e))?
            .map_err(|e| PipelineError {
                stage: PipelineStage::Recognizing,
                source: AppError::Ocr(e),
            })?;

        if recognized.is_empty() {
            info!("Pipeline run {}: no text detected", run_id);
            return Ok(PipelineOutcome::NoTextDetected);
        }
        debug!(
            "Pipeline run {}: recognized {} chars as {}",
            run_id,
            recognized.text.chars().count(),
            recognized.language
        );

        // Stage 4: translate
        notify(&progress, PipelineStage::Translating);
        let translated = self
            .translator
            .translate(
                &recognized.text,
                recognized.language,
                request.target_language,
                request.provider.as_deref(),
            )
            .await
            .map_err(|e| PipelineError {
                stage: PipelineStage::Translating,
                source: AppError::Translation(e),
            })?;

        info!("Pipeline run {} finished", run_id);
        Ok(PipelineOutcome::Translated {
            original: recognized.text,
            translated,
            source_language: recognized.language,
        })
    }
}

fn notify(progress: &Option<StageCallback>, stage: PipelineStage) {
    if let Some(callback) = progress {
        callback(stage);
    }
}

fn stage_panic(stage: PipelineStage, error: tokio::task::JoinError) -> PipelineError {
    PipelineError {
        stage,
        source: AppError::Unknown(format!("pipeline task panicked: {}", error)),
    }
}
