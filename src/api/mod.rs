// HTTP API module for the Identity Registry Service
//
// Axum REST interface over the verification service. Handlers are thin:
// they deserialize the request body, delegate to the service and shape the
// JSON response; all error translation lives in the `RegistryError`
// IntoResponse impl.
//
// # Endpoints
//
// * `GET  /` and `GET /data` — informational
// * `GET  /health` — liveness probe
// * `POST /data` — direct record insertion (no OTP)
// * `POST /data/generateOtp`, `POST /data/verifyOtp` — Aadhaar flow
// * `POST /data/generatePanOtp`, `POST /data/verifyPanOtp` — PAN flow
// * `POST /data/checkAadhaar`, `POST /data/checkPan` — uniqueness queries

use crate::error::{RegistryError, Result};
use crate::service::VerificationService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod handlers;

/// Application state shared with all routes.
#[derive(Clone)]
pub struct AppState {
    /// The verification state machine behind every endpoint
    pub service: Arc<VerificationService>,
}

/// Build the API router. Exposed separately from [`ApiServer`] so tests
/// can drive the router without binding a socket.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/data",
            post(handlers::create_record).get(handlers::data_route_info),
        )
        .route("/data/generateOtp", post(handlers::generate_aadhaar_otp))
        .route("/data/verifyOtp", post(handlers::verify_aadhaar_otp))
        .route("/data/generatePanOtp", post(handlers::generate_pan_otp))
        .route("/data/verifyPanOtp", post(handlers::verify_pan_otp))
        .route("/data/checkAadhaar", post(handlers::check_aadhaar_unique))
        .route("/data/checkPan", post(handlers::check_pan_unique))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The HTTP server wrapping the verification service.
pub struct ApiServer {
    app_state: Arc<AppState>,
    bind_address: String,
    enable_cors: bool,
}

impl ApiServer {
    pub fn new(service: Arc<VerificationService>, bind_address: String, enable_cors: bool) -> Self {
        Self {
            app_state: Arc::new(AppState { service }),
            bind_address,
            enable_cors,
        }
    }

    /// Bind and serve until shutdown. Does not return under normal
    /// operation.
    pub async fn start(&self) -> Result<()> {
        let mut app = create_router(self.app_state.clone());
        if self.enable_cors {
            app = app.layer(CorsLayer::permissive());
        }

        let addr = self
            .bind_address
            .parse()
            .map_err(|e| RegistryError::Config(format!("Invalid bind address: {}", e)))?;

        info!("Starting API server on {}", self.bind_address);

        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .map_err(|e| RegistryError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
