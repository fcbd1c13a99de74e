//! Vexa API client for meeting recording bot management.
//!
//! This module provides an HTTP client for interacting with the Vexa API
//! to send recording bots into Google Meet sessions and fetch their
//! transcripts once the meeting has ended.

use crate::error::{
    DomainErrorKind, EntityErrorKind, Error, ExternalErrorKind, InternalErrorKind,
};
use log::*;
use serde::Serialize;
use serde_json::Value;

/// Request to send a bot into a meeting
#[derive(Debug, Serialize)]
pub struct StartBotRequest {
    pub platform: String,
    pub native_meeting_id: String,
    pub bot_name: String,
}

/// Outcome of a successful bot start
#[derive(Debug)]
pub struct StartedBot {
    /// Native meeting code the bot joined (extracted from the meeting URL)
    pub platform_meeting_id: String,
    /// Verbatim bot record returned by the API
    pub data: Value,
}

/// Extracts the native meeting code from a Google Meet URL.
///
/// Meet URLs look like `https://meet.google.com/abc-defg-hij`; anything not
/// on that host is rejected before any network call is made.
pub fn platform_meeting_id_from_url(meeting_url: &str) -> Result<String, Error> {
    let Some((_, tail)) = meeting_url.split_once("meet.google.com/") else {
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid,
            )),
        });
    };

    let meeting_id = tail.split('?').next().unwrap_or_default().trim_matches('/');

    if meeting_id.is_empty() {
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid,
            )),
        });
    }

    Ok(meeting_id.to_string())
}

/// Vexa API client
pub struct VexaClient {
    client: reqwest::Client,
    base_url: String,
}

impl VexaClient {
    /// Create a new Vexa client with the given API key and base URL
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, Error> {
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
        headers.insert("x-api-key", header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a recording bot into the meeting behind the given Meet URL
    pub async fn start_bot(&self, meeting_url: &str, bot_name: &str) -> Result<StartedBot, Error> {
        let platform_meeting_id = platform_meeting_id_from_url(meeting_url)?;
        let url = format!("{}/bots", self.base_url);

        debug!("Starting Vexa bot for meeting: {platform_meeting_id}");

        let request = StartBotRequest {
            platform: "google_meet".to_string(),
            native_meeting_id: platform_meeting_id.clone(),
            bot_name: bot_name.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to start Vexa bot: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let data: Value = response.json().await.map_err(|e| {
                warn!("Failed to parse Vexa response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Vexa".to_string(),
                    )),
                }
            })?;
            info!("Started Vexa bot for meeting: {platform_meeting_id}");
            Ok(StartedBot {
                platform_meeting_id,
                data,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Vexa API error: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }

    /// Fetch the raw transcript payload for a meeting.
    ///
    /// The payload shape varies between API versions; callers hand it to the
    /// transcript normalizer rather than picking fields out of it here.
    pub async fn get_transcript(&self, platform_meeting_id: &str) -> Result<Value, Error> {
        let url = format!(
            "{}/transcripts/google_meet/{}",
            self.base_url, platform_meeting_id
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to fetch Vexa transcript: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        })?;

        if response.status().is_success() {
            let payload: Value = response.json().await.map_err(|e| {
                warn!("Failed to parse Vexa transcript response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Vexa".to_string(),
                    )),
                }
            })?;
            Ok(payload)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Vexa API error: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }

    /// Remove the bot from a meeting
    pub async fn delete_bot(&self, platform_meeting_id: &str) -> Result<(), Error> {
        let url = format!("{}/bots/google_meet/{}", self.base_url, platform_meeting_id);

        debug!("Removing Vexa bot from meeting: {platform_meeting_id}");

        let response = self.client.delete(&url).send().await.map_err(|e| {
            warn!("Failed to remove Vexa bot: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        })?;

        if response.status().is_success() {
            info!("Removed Vexa bot from meeting: {platform_meeting_id}");
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Failed to remove Vexa bot: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }
}
