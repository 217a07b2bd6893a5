/*!
 * OCR engine unit tests against a scripted backend
 */

use image::{DynamicImage, GrayImage, Luma};

use lingoshot::errors::OcrError;
use lingoshot::language::{Language, LanguageHint};
use lingoshot::ocr::OcrEngine;
use lingoshot::preprocess::CropRect;

use crate::common::stub_backends::StubOcrBackend;

fn blank_image() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([255])))
}

#[test]
fn test_autoDetect_shouldPickLanguageWithMostCharacters() {
    // en yields 5 non-whitespace chars, ru 12, ja 0
    let backend = StubOcrBackend::new()
        .with_reply(Language::En, "Hello")
        .with_reply(Language::Ru, "АБВГДЕЖЗИКЛМ")
        .with_reply(Language::Ja, "");
    let engine = OcrEngine::with_backend(Box::new(backend));

    let result = engine
        .recognize(&blank_image(), None, LanguageHint::Auto)
        .expect("recognition should succeed");

    assert_eq!(result.language, Language::Ru);
    assert_eq!(result.text, "АБВГДЕЖЗИКЛМ");
}

#[test]
fn test_autoDetect_shouldRunEveryLanguageInPriorityOrder() {
    let backend = StubOcrBackend::new().with_reply(Language::En, "text");
    let calls = backend.calls();
    let engine = OcrEngine::with_backend(Box::new(backend));

    engine
        .recognize(&blank_image(), None, LanguageHint::Auto)
        .expect("recognition should succeed");

    assert_eq!(
        *calls.lock().unwrap(),
        vec![Language::En, Language::Ru, Language::Ja]
    );
}

#[test]
fn test_autoDetect_withTiedCounts_shouldPreferEarlierLanguage() {
    let backend = StubOcrBackend::new()
        .with_reply(Language::En, "abcde")
        .with_reply(Language::Ru, "абвгд")
        .with_reply(Language::Ja, "あいうえお");
    let engine = OcrEngine::with_backend(Box::new(backend));

    let result = engine
        .recognize(&blank_image(), None, LanguageHint::Auto)
        .expect("recognition should succeed");

    assert_eq!(result.language, Language::En);
}

#[test]
fn test_autoDetect_withNoTextAnywhere_shouldReturnEmptyResult() {
    let backend = StubOcrBackend::new();
    let engine = OcrEngine::with_backend(Box::new(backend));

    let result = engine
        .recognize(&blank_image(), None, LanguageHint::Auto)
        .expect("empty recognition is not an error");

    assert!(result.is_empty());
}

#[test]
fn test_exactHint_shouldOnlyInvokeThatLanguage() {
    let backend = StubOcrBackend::new().with_reply(Language::Ja, "  こんにちは \n");
    let calls = backend.calls();
    let engine = OcrEngine::with_backend(Box::new(backend));

    let result = engine
        .recognize(&blank_image(), None, LanguageHint::Exact(Language::Ja))
        .expect("recognition should succeed");

    assert_eq!(*calls.lock().unwrap(), vec![Language::Ja]);
    assert_eq!(result.language, Language::Ja);
    assert_eq!(result.text, "こんにちは", "result should be trimmed");
}

#[test]
fn test_recognize_withBackendFailure_shouldReturnRecognitionError() {
    let backend = StubOcrBackend::failing("backend exploded");
    let engine = OcrEngine::with_backend(Box::new(backend));

    let result = engine.recognize(&blank_image(), None, LanguageHint::Auto);
    match result {
        Err(OcrError::Recognition(message)) => assert!(message.contains("backend exploded")),
        other => panic!("Expected recognition error, got {:?}", other),
    }
}

#[test]
fn test_recognize_withCrop_shouldStillRecognize() {
    let backend = StubOcrBackend::new().with_reply(Language::En, "cropped");
    let engine = OcrEngine::with_backend(Box::new(backend));

    let result = engine
        .recognize(
            &blank_image(),
            Some(CropRect {
                x: 2,
                y: 2,
                width: 8,
                height: 8,
            }),
            LanguageHint::Exact(Language::En),
        )
        .expect("recognition should succeed");

    assert_eq!(result.text, "cropped");
}
