/*!
 * Translation dispatch for recognized text.
 *
 * This module contains the cache-first translation service. It is split
 * into submodules:
 *
 * - `core`: Core dispatch logic and service definition
 * - `prompts`: Prompt construction for translation requests
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::prompts::build_translation_prompt;

// Submodules
pub mod core;
pub mod prompts;
