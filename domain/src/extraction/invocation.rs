//! Model invocation strategies.
//!
//! The service has historically run task extraction two ways: with the
//! backend's native schema-constrained JSON mode, and with free-text
//! generation cleaned up by the recovery chain. Both live behind one trait
//! and are selected by configuration, not by forked call sites.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::extraction::contract::{self, ExtractionResponse};
use crate::extraction::recovery;
use crate::gateway::gemini::{GeminiClient, GenerationOptions};
use async_trait::async_trait;
use log::*;
use service::config::{Config, GenerationMode};
use std::sync::Arc;

const MAX_OUTPUT_TOKENS: i32 = 4000;

/// Result of one model invocation: the decoded contract plus the raw text,
/// kept for the diagnostic sink.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub response: ExtractionResponse,
    pub raw: String,
}

/// One generation attempt against the language model.
///
/// Upstream call failures and undecodable output are both errors; an empty
/// task list is only ever a successful, genuinely empty result. A single
/// attempt per call, never retried here.
#[async_trait]
pub trait ModelInvocation: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<Invocation, Error>;

    /// Identifier for the active strategy, used in logs
    fn mode(&self) -> &'static str;
}

/// Strategy that lets the backend enforce the output contract directly.
pub struct SchemaConstrained {
    client: GeminiClient,
}

impl SchemaConstrained {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelInvocation for SchemaConstrained {
    async fn invoke(&self, prompt: &str) -> Result<Invocation, Error> {
        let options = GenerationOptions {
            response_schema: Some(contract::response_schema()),
            max_output_tokens: MAX_OUTPUT_TOKENS,
            ..Default::default()
        };

        let raw = self.client.generate(prompt, &options).await?;

        let response: ExtractionResponse = serde_json::from_str(&raw).map_err(|err| {
            warn!("Schema-constrained output failed to decode: {err:?}");
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::ModelResponse(format!(
                    "Model output did not match the task schema, beginning with: {}",
                    recovery::excerpt(&raw)
                ))),
            }
        })?;

        Ok(Invocation { response, raw })
    }

    fn mode(&self) -> &'static str {
        "schema"
    }
}

/// Strategy that generates free text and salvages JSON via the recovery chain.
pub struct FreeTextRecovery {
    client: GeminiClient,
}

impl FreeTextRecovery {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelInvocation for FreeTextRecovery {
    async fn invoke(&self, prompt: &str) -> Result<Invocation, Error> {
        let options = GenerationOptions {
            max_output_tokens: MAX_OUTPUT_TOKENS,
            ..Default::default()
        };

        let raw = self.client.generate(prompt, &options).await?;
        let response = recovery::recover_extraction(&raw)?;

        Ok(Invocation { response, raw })
    }

    fn mode(&self) -> &'static str {
        "freetext"
    }
}

/// Builds the configured invocation strategy over a Gemini client.
/// Called once by the composition root; the result is shared across requests.
pub fn from_config(config: &Config) -> Result<Arc<dyn ModelInvocation>, Error> {
    let api_key = config.gemini_api_key().ok_or_else(|| {
        warn!("Failed to get Gemini API key from config");
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })?;

    let client = GeminiClient::new(&api_key, config.gemini_base_url(), config.gemini_model())?;

    Ok(match config.generation_mode() {
        GenerationMode::Schema => Arc::new(SchemaConstrained::new(client)),
        GenerationMode::FreeText => Arc::new(FreeTextRecovery::new(client)),
    })
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
    async fn freetext_strategy_recovers_fenced_output() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body("```json\n{\"tasks\": []}\n```"))
            .create_async()
            .await;

        let client = GeminiClient::new("test-key", &server.url(), "gemini-2.5-flash").unwrap();
        let strategy = FreeTextRecovery::new(client);

        let invocation = strategy.invoke("extract").await.unwrap();

        assert!(invocation.response.tasks.is_empty());
        assert!(invocation.raw.contains("```"));
    }

    #[tokio::test]
    async fn schema_strategy_rejects_undecodable_output_with_an_excerpt() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body("definitely not json"))
            .create_async()
            .await;

        let client = GeminiClient::new("test-key", &server.url(), "gemini-2.5-flash").unwrap();
        let strategy = SchemaConstrained::new(client);

        let err = strategy.invoke("extract").await.unwrap_err();
        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::ModelResponse(message)) => {
                assert!(message.contains("definitely not json"));
            }
            other => panic!("expected a model response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upstream_failure_is_an_error_for_both_strategies() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(500)
            .with_body("internal error")
            .expect_at_least(2)
            .create_async()
            .await;

        let schema = SchemaConstrained::new(
            GeminiClient::new("test-key", &server.url(), "gemini-2.5-flash").unwrap(),
        );
        let freetext = FreeTextRecovery::new(
            GeminiClient::new("test-key", &server.url(), "gemini-2.5-flash").unwrap(),
        );

        assert!(schema.invoke("extract").await.is_err());
        assert!(freetext.invoke("extract").await.is_err());
    }
}
