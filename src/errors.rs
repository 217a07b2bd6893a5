/*!
 * Error types for the lingoshot application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur during optical character recognition
#[derive(Error, Debug)]
pub enum OcrError {
    /// Error when the input cannot be decoded as an image
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// Error when the OCR backend cannot be invoked at all
    /// (e.g. the tesseract binary is missing)
    #[error("OCR backend unavailable: {0}")]
    Unavailable(String),

    /// Error raised by the backend during recognition
    #[error("OCR recognition failed: {0}")]
    Recognition(String),
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during translation dispatch
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The provider has no API key configured; the backend is never called
    #[error("No API key configured for provider '{0}'")]
    MissingCredentials(String),

    /// The requested provider is not registered
    #[error("Unknown translation provider: {0}")]
    UnknownProvider(String),

    /// Translation was requested for empty source text
    #[error("Refusing to translate empty source text")]
    EmptySourceText,

    /// Error reading from or writing to the history store
    #[error("History store error: {0}")]
    Storage(String),

    /// Error from the provider API, with the backend's message embedded
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors reported by a capture source collaborator
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The capture operation itself failed
    #[error("Capture failed: {0}")]
    Failed(String),

    /// The captured bytes could not be decoded as an image
    #[error("Failed to decode captured image: {0}")]
    ImageDecode(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the application configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the capture collaborator
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Error from the OCR stage
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Error from translation dispatch
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
