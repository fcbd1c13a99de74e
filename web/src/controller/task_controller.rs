//! Controller for task retrieval, user-directed modification, completion,
//! and export.

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
use domain::meeting as MeetingApi;
use domain::task::{self as TaskApi, NewTask};
use domain::tasks;
use domain::transcript as TranscriptApi;
use domain::Id;
use log::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use service::config::ApiVersion;
use utoipa::ToSchema;

/// Request body for the task modification flow
#[derive(Debug, Deserialize, ToSchema)]
pub struct ModifyTasksRequest {
    /// Free-text instruction, e.g. "reassign the report task to Bob"
    pub modification_request: String,
}

/// Export payload consumed by the external report renderer
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskExportResponse {
    pub platform_meeting_id: String,
    pub meeting_url: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    pub tasks: Vec<tasks::Model>,
}

/// Helper to create a not-found error
fn not_found_error() -> DomainError {
    DomainError {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)),
    }
}

/// Helper to create a validation error
fn invalid_error() -> DomainError {
    DomainError {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)),
    }
}

/// GET /meetings/{id}/tasks
#[utoipa::path(
    get,
    path = "/meetings/{id}/tasks",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id"),
    ),
    responses(
        (status = 200, description = "All tasks for the meeting", body = [tasks::Model]),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET tasks for meeting: {id}");

    let db = app_state.db_conn_ref();

    let meeting = MeetingApi::find_by_id(db, id).await?;
    let tasks = TaskApi::find_by_meeting_id(db, meeting.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tasks)))
}

/// POST /meetings/{id}/tasks/modify
///
/// Re-run the extraction pipeline with the user's modification request and
/// replace the meeting's entire task set with the result.
#[utoipa::path(
    post,
    path = "/meetings/{id}/tasks/modify",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id"),
    ),
    request_body = ModifyTasksRequest,
    responses(
        (status = 200, description = "The complete replacement task set", body = [tasks::Model]),
        (status = 404, description = "Meeting or transcript not found"),
        (status = 422, description = "Empty modification request"),
        (status = 502, description = "Model call failed or model output was unusable"),
    )
)]
pub async fn modify(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(request): Json<ModifyTasksRequest>,
) -> Result<impl IntoResponse, Error> {
    info!("POST modify tasks for meeting: {id}");

    // Reject an empty instruction before any model call is attempted
    if request.modification_request.trim().is_empty() {
        return Err(invalid_error().into());
    }

    let db = app_state.db_conn_ref();

    // 1. Look up the meeting and its stored transcript
    let meeting = MeetingApi::find_by_id(db, id).await?;

    let transcript = TranscriptApi::find_by_meeting_id(db, meeting.id)
        .await?
        .ok_or_else(not_found_error)?;

    // 2. Snapshot the current task set for the prompt
    let existing = TaskApi::find_by_meeting_id(db, meeting.id).await?;
    let snapshot: Vec<NewTask> = existing
        .iter()
        .map(|task| NewTask {
            assignee_name: task.assignee_name.clone(),
            task_description: task.task_description.clone(),
            deadline: task.deadline.clone(),
            priority: task.priority.clone(),
        })
        .collect();

    // 3. Run the modification pipeline
    let extraction = extraction::modify(
        app_state.model.as_ref(),
        app_state.diagnostics.as_ref(),
        &meeting.platform_meeting_id,
        &transcript.processed_text,
        &snapshot,
        &request.modification_request,
        transcript.additional_context.as_deref(),
    )
    .await?;

    // 4. Replace the meeting's task set wholesale
    let replaced = TaskApi::replace_for_meeting(db, meeting.id, extraction.tasks).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), replaced)))
}

/// PUT /tasks/{id}/complete
#[utoipa::path(
    put,
    path = "/tasks/{id}/complete",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Task id to mark completed"),
    ),
    responses(
        (status = 200, description = "The completed task", body = tasks::Model),
        (status = 404, description = "Task not found"),
    )
)]
pub async fn complete(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT complete task: {id}");

    let task = TaskApi::mark_completed(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), task)))
}

/// GET /meetings/{id}/tasks/export
///
/// Export payload for the meeting's tasks, consumed verbatim by an external
/// report renderer.
#[utoipa::path(
    get,
    path = "/meetings/{id}/tasks/export",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Meeting id"),
    ),
    responses(
        (status = 200, description = "Export payload for the meeting's tasks", body = TaskExportResponse),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn export(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET task export for meeting: {id}");

    let db = app_state.db_conn_ref();

    let meeting = MeetingApi::find_by_id(db, id).await?;
    let tasks = TaskApi::find_by_meeting_id(db, meeting.id).await?;

    let response = TaskExportResponse {
        platform_meeting_id: meeting.platform_meeting_id,
        meeting_url: meeting.meeting_url,
        created_at: meeting.created_at,
        tasks,
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), response)))
}
