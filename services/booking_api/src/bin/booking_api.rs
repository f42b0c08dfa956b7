//! services/booking_api/src/bin/booking_api.rs

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::{routing::get, Router};
use booking_api_lib::{
    adapters::{SystemClock, TracingNotifier},
    config::Config,
    error::ApiError,
    web::{
        availability_handler, list_practitioners_handler, list_slots_handler, rest::ApiDoc,
        state::AppState, ws_handler,
    },
};
use booking_core::roster::Roster;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Load the Roster ---
    let roster = Arc::new(Roster::sample());
    info!(
        practitioners = roster.list_practitioners().len(),
        slots = roster.list_slot_labels().len(),
        appointments = roster.existing_appointments().len(),
        "Roster loaded."
    );

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        roster,
        clock: Arc::new(SystemClock),
        notifier: Arc::new(TracingNotifier::new()),
    });

    let origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid ALLOWED_ORIGIN '{}': {}",
            config.allowed_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/practitioners", get(list_practitioners_handler))
        .route("/slots", get(list_slots_handler))
        .route("/availability", get(availability_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
