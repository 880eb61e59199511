// src/gateway.rs — The three gateway operations: chat, translate, annotate
//
// Shared by the HTTP handlers and the terminal client. Each operation is a
// single gateway call with no retry; anything that goes wrong — transport
// failure, non-success status, malformed structured output — collapses
// into `KotobaError::Gateway`.

use serde::Deserialize;

use crate::infra::errors::KotobaError;
use crate::prompts;
use crate::provider::{Content, GenerateRequest, ModelProvider};
use crate::session::Annotation;

/// Parsed structured output of the annotate operation.
#[derive(Debug, Deserialize)]
struct AnnotationOutput {
    annotations: Vec<Annotation>,
}

/// Translate `text` between languages; returns the model output verbatim.
pub async fn translate(
    provider: &dyn ModelProvider,
    model: &str,
    text: &str,
    source_language: &str,
    target_language: &str,
) -> Result<String, KotobaError> {
    let prompt = prompts::translate_prompt(source_language, target_language, text);
    provider
        .generate(GenerateRequest::single_turn(model, prompt))
        .await
}

/// Extract (word, explanation) annotations from `text` via structured
/// output. The model is asked to preserve exact surface form so the
/// matcher can find each word by substring search.
pub async fn annotate(
    provider: &dyn ModelProvider,
    model: &str,
    text: &str,
    language: &str,
    explanation_language: &str,
) -> Result<Vec<Annotation>, KotobaError> {
    let prompt = prompts::annotate_prompt(language, explanation_language, text);
    let request = GenerateRequest {
        model: model.to_string(),
        contents: vec![Content::user(prompt)],
        response_schema: Some(prompts::annotation_schema()),
        ..Default::default()
    };

    let output = provider.generate(request).await?;
    let parsed: AnnotationOutput = serde_json::from_str(&output)
        .map_err(|e| KotobaError::gateway(format!("malformed annotation output: {e}")))?;
    Ok(parsed.annotations)
}

/// One chat turn: replay `history` as multi-turn contents, then send the
/// instruction-wrapped user message.
pub async fn chat(
    provider: &dyn ModelProvider,
    model: &str,
    history: &[Content],
    native_language: &str,
    learning_language: &str,
    message: &str,
) -> Result<String, KotobaError> {
    let prompt = prompts::chat_prompt(native_language, learning_language, message);

    let mut contents = history.to_vec();
    contents.push(Content::user(prompt));

    let request = GenerateRequest {
        model: model.to_string(),
        contents,
        ..Default::default()
    };
    provider.generate(request).await
}
