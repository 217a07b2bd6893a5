/*!
 * Database module for persistent storage of translation history.
 *
 * This module provides SQLite-based persistence for the translation
 * history, which doubles as the translation cache: completed translations
 * are appended here and looked up before any provider call.
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{NewTranslation, TranslationRecord};
pub use repository::HistoryRepository;
