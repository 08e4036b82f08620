//! Router assembly and shared state for the web interface.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::store::SharedTaskStore;

use super::pages;

/// Shared application state.
pub struct AppState {
    pub store: SharedTaskStore,
}

/// Start the HTTP server. Mutation paths are registered as POST only, so a
/// GET to them is rejected with 405 by the router itself.
pub async fn serve(config: Config, store: SharedTaskStore) -> anyhow::Result<()> {
    let state = Arc::new(AppState { store });

    let app = Router::new()
        .route("/", get(pages::index))
        .route("/edit/:summary", get(pages::edit))
        .route("/add", post(pages::add))
        .route("/set/:summary", post(pages::set))
        .route("/delete/:summary", post(pages::delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("serving on http://{}", config.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
