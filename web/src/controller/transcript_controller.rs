//! Controller for transcript processing.
//!
//! Fetches the raw transcript for a meeting from the bot platform, runs the
//! extraction pipeline over it, and persists both the transcript and the
//! extracted tasks.

use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind,
};
use domain::extraction;
use domain::extraction::normalizer;
use domain::meeting as MeetingApi;
use domain::task as TaskApi;
use domain::tasks;
use domain::transcript as TranscriptApi;
use domain::transcripts;
use domain::Id;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::ApiVersion;
use utoipa::ToSchema;

/// Request body for processing a meeting's transcript
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProcessTranscriptRequest {
    /// Optional organizer-provided context handed to the extraction prompt
    pub additional_context: Option<String>,
}

/// Outcome of a transcript processing run
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessTranscriptResponse {
    pub transcript_id: Id,
    pub tasks_extracted: usize,
    pub tasks: Vec<tasks::Model>,
}

/// Helper to create a not-found error
fn not_found_error() -> DomainError {
    DomainError {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)),
    }
}

/// POST /meetings/{id}/transcript
///
/// Fetch the meeting's transcript from the bot platform, normalize it, and
/// run task extraction over the result.
#[utoipa::path(
    post,
    path = "/meetings/{id}/transcript",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id to process"),
    ),
    request_body = ProcessTranscriptRequest,
    responses(
        (status = 200, description = "Transcript processed and tasks extracted", body = ProcessTranscriptResponse),
        (status = 404, description = "Meeting not found"),
        (status = 502, description = "Bot platform or model call failed, or model output was unusable"),
    )
)]
pub async fn process(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(request): Json<ProcessTranscriptRequest>,
) -> Result<impl IntoResponse, Error> {
    info!("POST process transcript for meeting: {id}");

    let db = app_state.db_conn_ref();

    // 1. Look up the meeting
    let meeting = MeetingApi::find_by_id(db, id).await?;

    // 2. Fetch the raw transcript payload from the bot platform
    let raw_payload = app_state
        .bot_client
        .get_transcript(&meeting.platform_meeting_id)
        .await?;

    // 3. Normalize it into canonical speaker-attributed text
    let processed_text = normalizer::normalize(&raw_payload);

    // 4. Persist the transcript alongside the raw payload
    let transcript = TranscriptApi::create_or_replace(
        db,
        meeting.id,
        &raw_payload.to_string(),
        &processed_text,
        request.additional_context.clone(),
    )
    .await?;

    // 5. Run the extraction pipeline
    let extraction = extraction::extract(
        app_state.model.as_ref(),
        app_state.diagnostics.as_ref(),
        &meeting.platform_meeting_id,
        &processed_text,
        request.additional_context.as_deref(),
    )
    .await?;

    // 6. Persist the extracted tasks
    let saved = TaskApi::create_many(db, meeting.id, extraction.tasks).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        ProcessTranscriptResponse {
            transcript_id: transcript.id,
            tasks_extracted: saved.len(),
            tasks: saved,
        },
    )))
}

/// GET /meetings/{id}/transcript
#[utoipa::path(
    get,
    path = "/meetings/{id}/transcript",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id"),
    ),
    responses(
        (status = 200, description = "The stored transcript", body = transcripts::Model),
        (status = 404, description = "Meeting or transcript not found"),
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET transcript for meeting: {id}");

    let db = app_state.db_conn_ref();

    let meeting = MeetingApi::find_by_id(db, id).await?;

    let transcript = TranscriptApi::find_by_meeting_id(db, meeting.id)
        .await?
        .ok_or_else(not_found_error)?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), transcript)))
}
