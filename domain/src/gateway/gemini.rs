//! Gemini API client for language model generation.
//!
//! This module provides an HTTP client for the Google Generative Language
//! `generateContent` endpoint. It supports plain text generation as well as
//! JSON-mode generation constrained by a response schema; the extraction
//! strategies in `crate::extraction::invocation` build on both.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-call generation settings.
///
/// Temperature stays at zero for this service: extraction results should be
/// as repeatable as the backend allows.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: i32,
    /// When set, the call runs in JSON mode constrained by this schema
    pub response_schema: Option<Value>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_output_tokens: 4000,
            response_schema: None,
        }
    }
}

/// Request body for generateContent
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

/// A single conversation turn
#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// One text part of a turn
#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

/// Response from generateContent
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate
#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

/// Content of a candidate
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// One part of a candidate's content
#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key, base URL, and model id
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            warn!("Failed to create auth header: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Invalid API key format".to_string(),
                )),
            }
        })?;
        header_value.set_sensitive(true);
        headers.insert("x-goog-api-key", header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Execute a single generation call and return the candidate text.
    ///
    /// One attempt only; callers decide what a failure means. An empty
    /// candidate list (e.g. a safety block) is surfaced as an error rather
    /// than an empty string.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, Error> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
                response_mime_type: options
                    .response_schema
                    .as_ref()
                    .map(|_| "application/json".to_string()),
                response_schema: options.response_schema.clone(),
            },
        };

        debug!("Executing Gemini generation with model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to execute Gemini request: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let result: GenerateContentResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Gemini response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Gemini".to_string(),
                    )),
                }
            })?;

            let text: String = result
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();

            if text.is_empty() {
                warn!("Gemini response contained no candidate text");
                return Err(Error {
                    source: None,
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Model response contained no text".to_string(),
                    )),
                });
            }

            Ok(text)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": text}]}}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn generate_returns_the_first_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body("{\"tasks\": []}"))
            .create_async()
            .await;

        let client = GeminiClient::new("test-key", &server.url(), "gemini-2.5-flash").unwrap();
        let text = client
            .generate("extract tasks", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(text, "{\"tasks\": []}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_candidates_are_an_error_not_an_empty_string() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = GeminiClient::new("test-key", &server.url(), "gemini-2.5-flash").unwrap();
        let result = client
            .generate("extract tasks", &GenerationOptions::default())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn api_errors_surface_with_the_upstream_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(429)
            .with_body("rate limit exceeded")
            .create_async()
            .await;

        let client = GeminiClient::new("test-key", &server.url(), "gemini-2.5-flash").unwrap();
        let err = client
            .generate("extract tasks", &GenerationOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other("rate limit exceeded".to_string()))
        );
    }
}
