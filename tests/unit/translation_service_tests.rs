/*!
 * Translation dispatch unit tests with stubbed chat backends
 */

use std::sync::Arc;

use lingoshot::database::{HistoryRepository, NewTranslation};
use lingoshot::errors::TranslationError;
use lingoshot::language::Language;
use lingoshot::translation::TranslationService;

use crate::common::stub_backends::StubChatBackend;
use crate::common::{registry_with_keys, registry_without_keys};

fn in_memory_repo() -> HistoryRepository {
    HistoryRepository::new_in_memory().expect("Failed to create in-memory repository")
}

#[tokio::test]
async fn test_translate_withCacheHit_shouldNotInvokeBackend() {
    let repository = in_memory_repo();
    repository
        .insert_translation(NewTranslation::new("Hello", "Привет", "en", "ru", "deepseek"))
        .await
        .unwrap();

    let stub = StubChatBackend::new("should never be used");
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_with_keys(), repository, "deepseek")
        .with_backend("deepseek", Arc::new(stub));

    let translated = service
        .translate("Hello", Language::En, Language::Ru, Some("deepseek"))
        .await
        .expect("cache hit should succeed");

    assert_eq!(translated, "Привет");
    assert_eq!(tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_translate_withoutApiKey_shouldReturnMissingCredentials() {
    let stub = StubChatBackend::new("unreachable");
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_without_keys(), in_memory_repo(), "openai")
        .with_backend("openai", Arc::new(stub));

    let result = service
        .translate("Hello", Language::En, Language::Ru, Some("openai"))
        .await;

    match result {
        Err(TranslationError::MissingCredentials(provider)) => assert_eq!(provider, "openai"),
        other => panic!("Expected MissingCredentials, got {:?}", other),
    }
    assert_eq!(tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_translate_withUnknownProvider_shouldFailFast() {
    let service = TranslationService::new(registry_with_keys(), in_memory_repo(), "openai");

    let result = service
        .translate("Hello", Language::En, Language::Ru, Some("unknown"))
        .await;

    match result {
        Err(TranslationError::UnknownProvider(provider)) => assert_eq!(provider, "unknown"),
        other => panic!("Expected UnknownProvider, got {:?}", other),
    }
}

#[tokio::test]
async fn test_translate_endToEnd_shouldCacheAndReuseResult() {
    let stub = StubChatBackend::new("Привет");
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_with_keys(), in_memory_repo(), "openai")
        .with_backend("deepseek", Arc::new(stub));

    let first = service
        .translate("Hello", Language::En, Language::Ru, Some("deepseek"))
        .await
        .expect("translation should succeed");
    assert_eq!(first, "Привет");

    // Exactly one record with the full 4-tuple key
    let records = service.repository().list_recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_text, "Hello");
    assert_eq!(records[0].target_text, "Привет");
    assert_eq!(records[0].source_lang, "en");
    assert_eq!(records[0].target_lang, "ru");
    assert_eq!(records[0].provider, "deepseek");

    // A second identical request is served from the cache
    let second = service
        .translate("Hello", Language::En, Language::Ru, Some("deepseek"))
        .await
        .expect("cached translation should succeed");
    assert_eq!(second, "Привет");
    assert_eq!(tracker.lock().unwrap().call_count, 1);
    assert_eq!(service.repository().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_translate_withBackendFailure_shouldNotCacheAnything() {
    let stub = StubChatBackend::new("never returned");
    stub.fail_next_call();
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_with_keys(), in_memory_repo(), "openai")
        .with_backend("openai", Arc::new(stub));

    let result = service
        .translate("Hello", Language::En, Language::Ru, Some("openai"))
        .await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert_eq!(tracker.lock().unwrap().call_count, 1);
    assert_eq!(service.repository().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_translate_withEmptyText_shouldRefuseWithoutBackendCall() {
    let stub = StubChatBackend::new("unreachable");
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_with_keys(), in_memory_repo(), "openai")
        .with_backend("openai", Arc::new(stub));

    let result = service.translate("", Language::En, Language::Ru, None).await;

    assert!(matches!(result, Err(TranslationError::EmptySourceText)));
    assert_eq!(tracker.lock().unwrap().call_count, 0);
    assert_eq!(service.repository().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_translate_withoutOverride_shouldUseDefaultProvider() {
    let stub = StubChatBackend::new("Bonjour");
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_with_keys(), in_memory_repo(), "deepseek")
        .with_backend("deepseek", Arc::new(stub));

    service
        .translate("Hello", Language::En, Language::Ru, None)
        .await
        .expect("translation should succeed");

    assert_eq!(tracker.lock().unwrap().call_count, 1);
    let records = service.repository().list_recent(1).await.unwrap();
    assert_eq!(records[0].provider, "deepseek");
}

#[tokio::test]
async fn test_translate_shouldTrimBackendReply() {
    let stub = StubChatBackend::new("  Привет \n");
    let service = TranslationService::new(registry_with_keys(), in_memory_repo(), "openai")
        .with_backend("openai", Arc::new(stub));

    let translated = service
        .translate("Hello", Language::En, Language::Ru, Some("openai"))
        .await
        .expect("translation should succeed");

    assert_eq!(translated, "Привет");
    let records = service.repository().list_recent(1).await.unwrap();
    assert_eq!(records[0].target_text, "Привет");
}

#[tokio::test]
async fn test_translate_shouldSendFullLanguageNamesInPrompt() {
    let stub = StubChatBackend::new("こんにちは");
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_with_keys(), in_memory_repo(), "openai")
        .with_backend("openai", Arc::new(stub));

    service
        .translate("Hello", Language::En, Language::Ja, Some("openai"))
        .await
        .expect("translation should succeed");

    let tracker = tracker.lock().unwrap();
    let prompt = tracker.last_prompt.as_deref().expect("prompt recorded");
    assert!(prompt.contains("from English to Japanese"));
    assert!(prompt.ends_with("Text: Hello"));
    assert_eq!(tracker.last_model.as_deref(), Some("gpt-4"));
}

#[tokio::test]
async fn test_translate_withWhitespaceVariantKey_shouldMissCache() {
    let repository = in_memory_repo();
    repository
        .insert_translation(NewTranslation::new("Hello", "Привет", "en", "ru", "openai"))
        .await
        .unwrap();

    let stub = StubChatBackend::new("Привет снова");
    let tracker = stub.tracker();
    let service = TranslationService::new(registry_with_keys(), repository, "openai")
        .with_backend("openai", Arc::new(stub));

    // Trailing whitespace makes a different cache key, so the backend runs
    let translated = service
        .translate("Hello ", Language::En, Language::Ru, Some("openai"))
        .await
        .expect("translation should succeed");

    assert_eq!(translated, "Привет снова");
    assert_eq!(tracker.lock().unwrap().call_count, 1);
}
