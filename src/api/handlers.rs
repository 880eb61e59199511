// src/api/handlers.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{types::*, ApiState};
use crate::gateway;
use crate::provider::{Content, Role};
use crate::session::{DEFAULT_LEARNING_LANGUAGE, DEFAULT_NATIVE_LANGUAGE};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// 400 with a descriptive message when a required field is missing or empty.
fn require<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("{name} is required"),
            }),
        )),
    }
}

/// 500 with a generic body; the cause goes to the operator log only.
fn gateway_error(err: crate::infra::errors::KotobaError) -> ApiError {
    tracing::error!("gateway call failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Failed to communicate with the language service".into(),
        }),
    )
}

/// Language fields on the chat endpoint are optional; absent or empty
/// values fall back to the defaults rather than failing validation.
fn language_or<'a>(field: &'a Option<String>, default: &'a str) -> &'a str {
    match field.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// POST /api/v1/chat — One conversational turn with history replay.
/// Only `message` is required; `history` defaults to empty and the
/// language pair falls back to defaults.
pub async fn chat(
    State(state): State<ApiState>,
    Json(body): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    let message = require(&body.message, "Message")?;
    let native_language = language_or(&body.native_language, DEFAULT_NATIVE_LANGUAGE);
    let learning_language = language_or(&body.learning_language, DEFAULT_LEARNING_LANGUAGE);

    let history: Vec<Content> = body
        .history
        .iter()
        .map(|entry| Content {
            role: if entry.role == "model" {
                Role::Model
            } else {
                Role::User
            },
            text: entry.parts.clone(),
        })
        .collect();

    let response = gateway::chat(
        state.provider.as_ref(),
        &state.model,
        &history,
        native_language,
        learning_language,
        message,
    )
    .await
    .map_err(gateway_error)?;

    Ok(Json(ChatApiResponse { response }))
}

/// POST /api/v1/translate — Translate text between languages.
pub async fn translate(
    State(state): State<ApiState>,
    Json(body): Json<TranslateApiRequest>,
) -> Result<Json<TranslateApiResponse>, ApiError> {
    let text = require(&body.text, "Text")?;
    let source_language = require(&body.source_language, "Source language")?;
    let target_language = require(&body.target_language, "Target language")?;

    let translated_text = gateway::translate(
        state.provider.as_ref(),
        &state.model,
        text,
        source_language,
        target_language,
    )
    .await
    .map_err(gateway_error)?;

    Ok(Json(TranslateApiResponse { translated_text }))
}

/// POST /api/v1/annotate — Extract (word, explanation) annotations.
pub async fn annotate(
    State(state): State<ApiState>,
    Json(body): Json<AnnotateApiRequest>,
) -> Result<Json<AnnotateApiResponse>, ApiError> {
    let text = require(&body.text, "Text")?;
    let language = require(&body.language, "Language")?;
    let explanation_language = require(&body.explanation_language, "Explanation language")?;

    let annotations = gateway::annotate(
        state.provider.as_ref(),
        &state.model,
        text,
        language,
        explanation_language,
    )
    .await
    .map_err(gateway_error)?;

    Ok(Json(AnnotateApiResponse { annotations }))
}

/// GET /api/v1/health — Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
