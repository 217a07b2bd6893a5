/*!
 * OCR engine built on an external tesseract backend.
 *
 * The engine validates input, maps languages to backend codes, trims the
 * recognized text, and distinguishes "no text found" from recognition
 * failures. Language auto-detection runs recognition once per supported
 * language and keeps the densest result.
 */

use std::path::PathBuf;
use std::process::Command;

use image::{DynamicImage, GrayImage};
use log::debug;

use crate::errors::OcrError;
use crate::language::{AUTO_DETECT_ORDER, Language, LanguageHint};
use crate::preprocess::{self, CropRect};

/// Page segmentation mode passed to tesseract: assume a uniform text block
const TESSERACT_PSM: &str = "6";

/// Result of a recognition run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedText {
    /// Trimmed recognized text; empty when the backend found nothing
    pub text: String,
    /// Language the winning recognition ran under
    pub language: Language,
}

impl RecognizedText {
    /// Whether recognition found no text (an expected outcome, not an error)
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Recognition backend interface
///
/// Implementations receive a preprocessed single-channel image and return
/// the raw recognized text for one language. Tests substitute scripted
/// backends through this trait.
pub trait OcrBackend: Send + Sync {
    /// Recognize text in the image under the given language
    fn recognize(&self, image: &GrayImage, language: Language) -> Result<String, OcrError>;
}

/// Backend that shells out to the tesseract binary
pub struct TesseractBackend {
    /// Path to the tesseract executable
    executable: PathBuf,
}

impl TesseractBackend {
    /// Create a backend that resolves `tesseract` from PATH
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("tesseract"),
        }
    }

    /// Create a backend with an explicit executable path
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn recognize(&self, image: &GrayImage, language: Language) -> Result<String, OcrError> {
        let dir = tempfile::tempdir()
            .map_err(|e| OcrError::Recognition(format!("failed to create temp dir: {}", e)))?;
        let input_path = dir.path().join("ocr-input.png");
        image
            .save(&input_path)
            .map_err(|e| OcrError::Recognition(format!("failed to write temp image: {}", e)))?;

        let output = Command::new(&self.executable)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(language.tesseract_code())
            .arg("--psm")
            .arg(TESSERACT_PSM)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OcrError::Unavailable(format!(
                        "tesseract executable not found at {:?}",
                        self.executable
                    ))
                } else {
                    OcrError::Recognition(format!("failed to run tesseract: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// OCR engine: preprocessing plus backend recognition with auto-detection
pub struct OcrEngine {
    backend: Box<dyn OcrBackend>,
}

impl OcrEngine {
    /// Create an engine backed by tesseract resolved from PATH
    pub fn new() -> Self {
        Self::with_backend(Box::new(TesseractBackend::new()))
    }

    /// Create an engine backed by tesseract at an explicit path
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self::with_backend(Box::new(TesseractBackend::with_executable(executable)))
    }

    /// Create an engine with a custom recognition backend
    pub fn with_backend(backend: Box<dyn OcrBackend>) -> Self {
        Self { backend }
    }

    /// Preprocess the image and recognize text in it
    pub fn recognize(
        &self,
        image: &DynamicImage,
        crop: Option<CropRect>,
        hint: LanguageHint,
    ) -> Result<RecognizedText, OcrError> {
        let prepared = preprocess::preprocess(image, crop);
        self.recognize_prepared(&prepared, hint)
    }

    /// Recognize text in an already preprocessed image
    pub fn recognize_prepared(
        &self,
        prepared: &GrayImage,
        hint: LanguageHint,
    ) -> Result<RecognizedText, OcrError> {
        match hint {
            LanguageHint::Exact(language) => {
                let raw = self.backend.recognize(prepared, language)?;
                Ok(RecognizedText {
                    text: raw.trim().to_string(),
                    language,
                })
            }
            LanguageHint::Auto => {
                let mut candidates = Vec::with_capacity(AUTO_DETECT_ORDER.len());
                for language in AUTO_DETECT_ORDER {
                    let raw = self.backend.recognize(prepared, language)?;
                    debug!(
                        "auto-detect candidate {}: {} non-whitespace chars",
                        language,
                        non_whitespace_len(raw.trim())
                    );
                    candidates.push((language, raw));
                }
                Ok(select_auto_candidate(candidates))
            }
        }
    }
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the auto-detect winner: greatest non-whitespace character count,
/// earlier languages winning ties.
fn select_auto_candidate(candidates: Vec<(Language, String)>) -> RecognizedText {
    let mut best: Option<(usize, Language, String)> = None;

    for (language, raw) in candidates {
        let text = raw.trim().to_string();
        let score = non_whitespace_len(&text);
        let replaces = best.as_ref().is_none_or(|(top, _, _)| score > *top);
        if replaces {
            best = Some((score, language, text));
        }
    }

    match best {
        Some((_, language, text)) => RecognizedText { text, language },
        None => RecognizedText {
            text: String::new(),
            language: AUTO_DETECT_ORDER[0],
        },
    }
}

fn non_whitespace_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
