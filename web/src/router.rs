use crate::{controller::health_check_controller, AppState};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::controller::{meeting_controller, task_controller, transcript_controller};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Meeting Tasks API"
        ),
        paths(
            meeting_controller::create,
            meeting_controller::index,
            meeting_controller::read,
            meeting_controller::status,
            meeting_controller::complete,
            transcript_controller::process,
            transcript_controller::read,
            task_controller::index,
            task_controller::modify,
            task_controller::complete,
            task_controller::export,
        ),
        components(
            schemas(
                domain::meetings::Model,
                domain::transcripts::Model,
                domain::tasks::Model,
                meeting_controller::CreateMeetingRequest,
                meeting_controller::MeetingStatusResponse,
                meeting_controller::CompleteMeetingResponse,
                transcript_controller::ProcessTranscriptRequest,
                transcript_controller::ProcessTranscriptResponse,
                task_controller::ModifyTasksRequest,
                task_controller::TaskExportResponse,
            )
        ),
        tags(
            (name = "meeting_tasks", description = "Meeting transcript task extraction API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state);

    Router::new()
        .merge(meeting_routes(app_state.clone()))
        .merge(transcript_routes(app_state.clone()))
        .merge(task_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(cors)
}

fn meeting_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/meetings", post(meeting_controller::create))
        .route("/meetings", get(meeting_controller::index))
        .route("/meetings/:id", get(meeting_controller::read))
        .route("/meetings/:id/status", get(meeting_controller::status))
        .route("/meetings/:id/complete", post(meeting_controller::complete))
        .with_state(app_state)
}

fn transcript_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/meetings/:id/transcript",
            post(transcript_controller::process),
        )
        .route("/meetings/:id/transcript", get(transcript_controller::read))
        .with_state(app_state)
}

fn task_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/meetings/:id/tasks", get(task_controller::index))
        .route("/meetings/:id/tasks/modify", post(task_controller::modify))
        .route("/meetings/:id/tasks/export", get(task_controller::export))
        .route("/tasks/:id/complete", put(task_controller::complete))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-version")])
}
