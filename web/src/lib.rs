use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use domain::extraction::diagnostics::{DiagnosticSink, FileDiagnosticSink};
use domain::extraction::invocation::{self, ModelInvocation};
use domain::gateway::vexa::VexaClient;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;

pub use error::Error;

mod controller;
mod extractors;
pub mod router;

pub mod error;

/// Application state shared across request handlers.
///
/// This is the process's composition root: the bot client, the model
/// invocation strategy, and the diagnostic sink are constructed exactly once
/// here and injected into the pipeline, rather than living as module-level
/// singletons. Needs to implement Clone to be able to be passed into Router
/// as State.
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    pub bot_client: Arc<VexaClient>,
    pub model: Arc<dyn ModelInvocation>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl AppState {
    pub fn new(config: Config, db: &Arc<DatabaseConnection>) -> Result<Self, DomainError> {
        let vexa_api_key = config.vexa_api_key().ok_or_else(|| {
            warn!("Failed to get Vexa API key from config");
            DomainError {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;

        let bot_client = Arc::new(VexaClient::new(&vexa_api_key, config.vexa_base_url())?);
        let model = invocation::from_config(&config)?;
        let diagnostics: Arc<dyn DiagnosticSink> =
            Arc::new(FileDiagnosticSink::new(config.diagnostics_dir()));

        Ok(Self {
            database_connection: Arc::clone(db),
            config,
            bot_client,
            model,
            diagnostics,
        })
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}

/// Binds the configured interface/port and serves the API router until the
/// process is stopped.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;

    let router = router::define_routes(app_state);

    let listener = tokio::net::TcpListener::bind(format!("{interface}:{port}")).await?;
    info!("Server listening for requests on http://{interface}:{port}");

    axum::serve(listener, router).await
}
