mod configuration;
mod error;
mod routes;
mod state;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let settings = configuration::Settings::new()?;

    // Create app state
    let state = state::AppState::from_storage(&settings.storage);

    // Create router with CORS support
    let origin = match &settings.server.allowed_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    // Run server
    let listener = tokio::net::TcpListener::bind(settings.server.socket_addr()?).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
