// src/provider/google.rs — Google Generative AI (Gemini) provider

use async_trait::async_trait;

use super::{GenerateRequest, ModelProvider};
use crate::infra::errors::KotobaError;

pub struct GoogleProvider {
    api_key: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn base_url(&self) -> &str {
        "https://generativelanguage.googleapis.com/v1beta"
    }

    /// Build the Gemini request body from a GenerateRequest.
    fn build_request_body(&self, request: &GenerateRequest) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = request
            .contents
            .iter()
            .map(|c| {
                serde_json::json!({
                    "role": c.role.as_str(),
                    "parts": [{ "text": c.text }],
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
        });

        if let Some(ref system) = request.system {
            body["system_instruction"] = serde_json::json!({
                "parts": [{ "text": system }],
            });
        }

        // Generation config
        let mut gen_config = serde_json::json!({});
        if let Some(max_tokens) = request.max_tokens {
            gen_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            gen_config["temperature"] = serde_json::json!(temp);
        }
        if let Some(ref schema) = request.response_schema {
            gen_config["responseMimeType"] = serde_json::json!("application/json");
            gen_config["responseSchema"] = schema.clone();
        }
        if gen_config != serde_json::json!({}) {
            body["generationConfig"] = gen_config;
        }

        body
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, KotobaError> {
        let body = self.build_request_body(&request);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url(),
            request.model,
            self.api_key,
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| KotobaError::gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(KotobaError::gateway(format!(
                "HTTP {}: {}",
                status, error_body
            )));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| KotobaError::gateway(format!("Failed to parse response: {}", e)))?;

        // Extract text content from candidates[0].content.parts
        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut content = String::new();
        for part in &parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Content;

    #[test]
    fn test_body_replays_history_roles() {
        let provider = GoogleProvider::new("test-key".into());
        let request = GenerateRequest {
            model: "gemini-2.5-flash-lite".into(),
            contents: vec![
                Content::user("こんにちは"),
                Content::model("こんにちは！元気ですか？"),
                Content::user("元気です"),
            ],
            ..Default::default()
        };

        let body = provider.build_request_body(&request);
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "元気です");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_body_structured_output() {
        let provider = GoogleProvider::new("test-key".into());
        let request = GenerateRequest {
            model: "gemini-2.5-flash-lite".into(),
            contents: vec![Content::user("annotate this")],
            response_schema: Some(serde_json::json!({"type": "OBJECT"})),
            ..Default::default()
        };

        let body = provider.build_request_body(&request);
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_body_system_instruction() {
        let provider = GoogleProvider::new("test-key".into());
        let mut request = GenerateRequest::single_turn("gemini-2.5-flash-lite", "hello");
        request.system = Some("Respond only in Japanese.".into());

        let body = provider.build_request_body(&request);
        assert_eq!(
            body["system_instruction"]["parts"][0]["text"],
            "Respond only in Japanese."
        );
    }
}
