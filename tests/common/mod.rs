/*!
 * Common test utilities for the lingoshot test suite
 */

use lingoshot::app_config::ProviderConfig;
use lingoshot::providers::ProviderRegistry;

// Re-export the stub backends module
pub mod stub_backends;

/// Registry with the stock providers and test API keys configured
pub fn registry_with_keys() -> ProviderRegistry {
    let registry = ProviderRegistry::with_defaults();

    let mut openai = ProviderConfig::openai();
    openai.api_key = "sk-test-openai".to_string();
    registry.register(openai);

    let mut deepseek = ProviderConfig::deepseek();
    deepseek.api_key = "sk-test-deepseek".to_string();
    registry.register(deepseek);

    registry
}

/// Registry with the stock providers but no API keys
pub fn registry_without_keys() -> ProviderRegistry {
    ProviderRegistry::with_defaults()
}
