use log::*;
use service::config::Config;
use service::logging::Logger;
use std::sync::Arc;
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();

    Logger::init_logger(&config);

    info!("Starting meeting tasks service");

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(err) => {
            error!("Failed to connect to the database: {err:?}");
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(config, &db) {
        Ok(app_state) => app_state,
        Err(err) => {
            error!("Failed to initialize application state: {err:?}");
            std::process::exit(1);
        }
    };

    if let Err(err) = web::init_server(app_state).await {
        error!("Server error: {err:?}");
        std::process::exit(1);
    }
}
