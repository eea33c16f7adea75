use std::sync::Arc;

use tokio::net::TcpListener;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Error;
use crate::metrics::register_metrics;
use crate::routes;
use crate::session::Session;

pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
}

/// Loads the catalog and checks the quiz settings, so a bad setup fails at startup.
pub fn create_app_state(config: Config) -> Result<AppState, Error> {
    let catalog = Arc::new(Catalog::load(config.catalog.path.as_deref())?);
    Session::new(Arc::clone(&catalog), config.quiz.total_rounds)?;

    Ok(AppState { config, catalog })
}

pub async fn create_web_server(
    app_state: AppState,
    listener: TcpListener,
) -> Result<(), std::io::Error> {
    register_metrics();
    let router =
        routes::create_router(app_state.config.allow_cors).with_state(Arc::new(app_state));

    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await
}
