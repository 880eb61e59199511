// src/api/types.rs
//
// Wire field names are camelCase, matching the JSON contract of the
// original web client.

use serde::{Deserialize, Serialize};

use crate::session::Annotation;

/// Request body for a chat turn. `history` is optional and defaults to
/// empty; everything else is required (enforced in the handler so missing
/// fields produce a 400, not a deserialization error).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatApiRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
}

/// One prior conversation turn as the client stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub parts: String,
}

#[derive(Debug, Serialize)]
pub struct ChatApiResponse {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateApiRequest {
    pub text: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateApiResponse {
    pub translated_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateApiRequest {
    pub text: Option<String>,
    pub language: Option<String>,
    pub explanation_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateApiResponse {
    pub annotations: Vec<Annotation>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
