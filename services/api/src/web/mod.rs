pub mod rest;
pub mod state;

pub use rest::{
    generate_report_handler, health_handler, report_history_handler, vehicle_estimate_handler,
};

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// Builds the REST routes over the shared state. CORS and Swagger UI are layered on in the binary.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/reports", post(generate_report_handler))
        .route("/reports/{nickname}", get(report_history_handler))
        .route("/estimates/vehicle", post(vehicle_estimate_handler))
        .with_state(app_state)
}
