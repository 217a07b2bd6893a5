/*!
 * Prompt construction for translation requests.
 *
 * The instruction names both languages by their full English names and
 * pins the backend to returning only the translated text.
 */

use crate::language::Language;

/// Build the translation instruction sent as the user message
pub fn build_translation_prompt(text: &str, source: Language, target: Language) -> String {
    format!(
        "You are a professional translator.\n\
         Translate the following text from {} to {}, preserving the meaning, tone, and style.\n\
         Respond only with the translated text, without any additional commentary or explanations.\n\
         \n\
         Text: {}",
        source.full_name(),
        target.full_name(),
        text
    )
}
