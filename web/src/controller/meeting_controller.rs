//! Controller for meeting lifecycle operations.
//!
//! Handles starting a recording bot for a meeting, querying meeting state,
//! and completing a meeting (which removes the bot).

use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::meeting as MeetingApi;
use domain::meeting_status::MeetingStatus;
use domain::meetings::{self, Model as MeetingModel};
use domain::Id;
use log::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use service::config::ApiVersion;
use utoipa::ToSchema;

/// Request body for starting a recording bot
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMeetingRequest {
    pub meeting_url: String,
    /// Display name for the bot; the configured default applies when omitted
    pub bot_name: Option<String>,
}

/// Condensed lifecycle view of a meeting
#[derive(Debug, Serialize, ToSchema)]
pub struct MeetingStatusResponse {
    pub id: Id,
    pub platform_meeting_id: String,
    pub status: MeetingStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub completed_at: Option<DateTimeWithTimeZone>,
}

/// Outcome of completing a meeting
#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteMeetingResponse {
    #[serde(flatten)]
    pub meeting: MeetingModel,
    /// Whether the bot platform confirmed removing the bot
    pub bot_removed: bool,
}

/// POST /meetings
///
/// Start a recording bot for a Google Meet URL and register the meeting.
#[utoipa::path(
    post,
    path = "/meetings",
    params(ApiVersion),
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Bot started and meeting registered", body = meetings::Model),
        (status = 422, description = "Not a valid Google Meet URL"),
        (status = 502, description = "Bot platform rejected the request"),
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(request): Json<CreateMeetingRequest>,
) -> Result<impl IntoResponse, Error> {
    info!("POST Start recording bot for: {}", request.meeting_url);

    let bot_name = request
        .bot_name
        .unwrap_or_else(|| app_state.config.bot_name().to_string());

    // 1. Send the bot into the meeting; an invalid URL is rejected here
    //    before any network call
    let started = app_state
        .bot_client
        .start_bot(&request.meeting_url, &bot_name)
        .await?;

    // 2. Persist the meeting as active
    let meeting = MeetingApi::create(
        app_state.db_conn_ref(),
        &started.platform_meeting_id,
        &request.meeting_url,
        &bot_name,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), meeting)),
    ))
}

/// GET /meetings
#[utoipa::path(
    get,
    path = "/meetings",
    params(ApiVersion),
    responses(
        (status = 200, description = "All meetings, newest first", body = [meetings::Model]),
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all meetings");

    let meetings = MeetingApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), meetings)))
}

/// GET /meetings/{id}
#[utoipa::path(
    get,
    path = "/meetings/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id to retrieve"),
    ),
    responses(
        (status = 200, description = "The requested meeting", body = meetings::Model),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meeting by id: {id}");

    let meeting = MeetingApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), meeting)))
}

/// GET /meetings/{id}/status
#[utoipa::path(
    get,
    path = "/meetings/{id}/status",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id"),
    ),
    responses(
        (status = 200, description = "Lifecycle status of the meeting", body = MeetingStatusResponse),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn status(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meeting status: {id}");

    let meeting = MeetingApi::find_by_id(app_state.db_conn_ref(), id).await?;

    let response = MeetingStatusResponse {
        id: meeting.id,
        platform_meeting_id: meeting.platform_meeting_id,
        status: meeting.status,
        created_at: meeting.created_at,
        completed_at: meeting.completed_at,
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), response)))
}

/// POST /meetings/{id}/complete
///
/// Mark a meeting as completed and remove the bot. The meeting is marked
/// completed even if the bot platform fails to confirm removal.
#[utoipa::path(
    post,
    path = "/meetings/{id}/complete",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id to complete"),
    ),
    responses(
        (status = 200, description = "Meeting completed", body = CompleteMeetingResponse),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn complete(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("POST complete meeting: {id}");

    let db = app_state.db_conn_ref();

    // 1. Look up the meeting
    let meeting = MeetingApi::find_by_id(db, id).await?;

    // 2. Best-effort bot removal; the meeting completes regardless
    let bot_removed = match app_state
        .bot_client
        .delete_bot(&meeting.platform_meeting_id)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Failed to remove bot for meeting {}: {e:?}",
                meeting.platform_meeting_id
            );
            false
        }
    };

    // 3. Mark completed with a timestamp
    let meeting = MeetingApi::complete(db, id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        CompleteMeetingResponse {
            meeting,
            bot_removed,
        },
    )))
}
