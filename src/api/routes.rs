use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState, websocket::websocket_handler};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_handler))
        // Shipment endpoints
        .route(
            "/api/shipments",
            get(handlers::list_shipments).post(handlers::create_shipment),
        )
        .route("/api/shipments/:id", get(handlers::get_shipment))
        .route("/api/shipments/:id/assign", put(handlers::assign_shipment))
        .route(
            "/api/shipments/:id/status",
            patch(handlers::update_shipment_status),
        )
        .route("/api/shipments/:id/candidates", get(handlers::get_candidates))
        // Transporter endpoints
        .route(
            "/api/transporters",
            get(handlers::list_transporters).post(handlers::create_transporter),
        )
        .route("/api/transporters/busy", get(handlers::get_busy_transporters))
        .route("/api/transporters/:id", get(handlers::get_transporter))
        // Simulator endpoints
        .route("/api/simulator", get(handlers::get_simulator))
        .route("/api/simulator/start", post(handlers::start_simulator))
        .route("/api/simulator/stop", post(handlers::stop_simulator))
        // WebSocket endpoint
        .route("/ws", get(websocket_handler))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
