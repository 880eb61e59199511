// src/prompts.rs — Prompt templates for the three gateway operations
//
// The annotate prompt insists on exact surface form (conjugation and
// inflection preserved) because the matcher locates annotations by exact
// substring search over the source text.

/// System-style instruction for a chat turn. Sent concatenated with the
/// user's message so it applies to every turn regardless of history length.
pub fn chat_prompt(native_language: &str, learning_language: &str, message: &str) -> String {
    format!(
        "You are a language learning assistant. Your goal is to help the user practice {learning_language}. \
The user's native language is {native_language}. Respond only in {learning_language} unless the user \
explicitly asks for a translation or explanation in their native language. Keep responses concise and \
focused on language practice.\n\
Just respond in plain text (line breaks are allowed) without any additional formatting or explanation.\n\n\
User: {message}"
    )
}

pub fn translate_prompt(source_language: &str, target_language: &str, text: &str) -> String {
    format!(
        "Translate the following {source_language} text to {target_language}, \
respond only with the translated text:\n\n{text}"
    )
}

pub fn annotate_prompt(language: &str, explanation_language: &str, text: &str) -> String {
    format!(
        "You are an assistant for language learners. The user is learning {language} and needs help \
understanding important words and idioms in the text provided. Your task is to analyze the text and \
extract key words, phrases, and idiomatic expressions.\n\n\
For each important word, phrase, or idiom, provide:\n\
1. The word/phrase exactly as it appears in the original text (preserve the exact form, conjugation, and inflection)\n\
2. A brief explanation or definition in {explanation_language}\n\n\
Include important nouns, adjectives, content words, and idiomatic expressions or phrases that would be \
helpful for language learners. Keep the extracted words in their original form as they appear in the text.\n\n\
Text to analyze: \"{text}\""
    )
}

/// Gemini response schema constraining annotate output to
/// `{annotations: [{word, explanation}]}`.
pub fn annotation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "annotations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": {
                            "type": "STRING",
                            "description": "The word or phrase"
                        },
                        "explanation": {
                            "type": "STRING",
                            "description": "Explanation or definition of the word/phrase"
                        }
                    },
                    "required": ["word", "explanation"]
                },
                "description": "Important words, phrases, and idiomatic expressions with explanations"
            }
        },
        "required": ["annotations"]
    })
}
