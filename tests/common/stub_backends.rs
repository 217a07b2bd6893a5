/*!
 * Stub backend implementations for testing
 *
 * This module provides stub implementations of the chat, OCR, and capture
 * backends to avoid external calls in tests. Each stub records its
 * invocations so tests can assert on call counts.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, Luma};

use lingoshot::capture::CaptureSource;
use lingoshot::errors::{CaptureError, OcrError, ProviderError};
use lingoshot::language::Language;
use lingoshot::ocr::OcrBackend;
use lingoshot::providers::{ChatBackend, ChatRequest, ChatResponse};

/// Tracks backend calls to ensure no actual external requests are made
#[derive(Debug, Default)]
pub struct ApiCallTracker {
    /// Count of stub calls made
    pub call_count: usize,
    /// Content of the last user message received
    pub last_prompt: Option<String>,
    /// Model name of the last request received
    pub last_model: Option<String>,
    /// Should the next call fail
    pub should_fail: bool,
}

/// Chat backend that returns a scripted reply
pub struct StubChatBackend {
    reply: String,
    tracker: Arc<Mutex<ApiCallTracker>>,
}

impl StubChatBackend {
    /// Create a stub that always answers with the given text
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            tracker: Arc::new(Mutex::new(ApiCallTracker::default())),
        }
    }

    /// Get the call tracker
    pub fn tracker(&self) -> Arc<Mutex<ApiCallTracker>> {
        self.tracker.clone()
    }

    /// Configure the stub to fail on the next call
    pub fn fail_next_call(&self) {
        self.tracker.lock().unwrap().should_fail = true;
    }
}

#[async_trait]
impl ChatBackend for StubChatBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.call_count += 1;
        tracker.last_prompt = request.messages().first().map(|m| m.content.clone());
        tracker.last_model = Some(request.model().to_string());

        if tracker.should_fail {
            tracker.should_fail = false; // Reset for next call
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: "stub backend failure".to_string(),
            });
        }

        Ok(ChatResponse::from_text(&self.reply))
    }
}

/// OCR backend that returns scripted text per language
pub struct StubOcrBackend {
    replies: HashMap<Language, String>,
    fail_message: Option<String>,
    calls: Arc<Mutex<Vec<Language>>>,
}

impl StubOcrBackend {
    /// Create a stub with no scripted replies (recognizes nothing)
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            fail_message: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the text returned for a language
    pub fn with_reply(mut self, language: Language, text: &str) -> Self {
        self.replies.insert(language, text.to_string());
        self
    }

    /// Create a stub that fails every recognition
    pub fn failing(message: &str) -> Self {
        Self {
            replies: HashMap::new(),
            fail_message: Some(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Languages the stub was invoked for, in order
    pub fn calls(&self) -> Arc<Mutex<Vec<Language>>> {
        self.calls.clone()
    }
}

impl Default for StubOcrBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for StubOcrBackend {
    fn recognize(&self, _image: &GrayImage, language: Language) -> Result<String, OcrError> {
        self.calls.lock().unwrap().push(language);

        if let Some(message) = &self.fail_message {
            return Err(OcrError::Recognition(message.clone()));
        }

        Ok(self.replies.get(&language).cloned().unwrap_or_default())
    }
}

/// Capture source that yields a fixed in-memory image
pub struct StubCaptureSource {
    fail: bool,
}

impl StubCaptureSource {
    /// Create a source that captures successfully
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// Create a source whose capture always fails
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for StubCaptureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for StubCaptureSource {
    fn capture(&self) -> Result<DynamicImage, CaptureError> {
        if self.fail {
            return Err(CaptureError::Failed("stub capture failure".to_string()));
        }
        Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            16,
            16,
            Luma([255]),
        )))
    }
}
