// API handlers for the Identity Registry Service

use crate::api::AppState;
use crate::error::Result;
use crate::types::{
    AadhaarOtpRequest, AadhaarOtpVerifyRequest, AadhaarUniqueRequest, CreateResponse,
    ExistsResponse, MessageResponse, NewRecord, OtpResponse, PanOtpRequest, PanOtpVerifyRequest,
    PanUniqueRequest, PanVerifiedResponse,
};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

/// Informational root endpoint.
pub async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Identity Registry API".to_string(),
    })
}

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "timestamp": chrono::Utc::now().timestamp(),
        })),
    )
}

/// GET /data — informational only.
pub async fn data_route_info() -> impl IntoResponse {
    Json(MessageResponse {
        message: "You have reached the data Route".to_string(),
    })
}

/// POST /data — direct record insertion, no OTP involved.
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(record): Json<NewRecord>,
) -> Result<impl IntoResponse> {
    debug!("Direct record creation requested");
    let detail = state.service.create_record(record).await?;

    Ok((
        StatusCode::OK,
        Json(CreateResponse {
            message: "Data saved successfully.".to_string(),
            detail,
        }),
    ))
}

/// POST /data/generateOtp — Aadhaar flow, step 1.
pub async fn generate_aadhaar_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AadhaarOtpRequest>,
) -> Result<impl IntoResponse> {
    let otp = state.service.request_aadhaar_otp(request).await?;

    Ok((
        StatusCode::OK,
        Json(OtpResponse {
            message: "OTP generated and sent (simulated).".to_string(),
            otp,
        }),
    ))
}

/// POST /data/verifyOtp — Aadhaar flow, step 2.
pub async fn verify_aadhaar_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AadhaarOtpVerifyRequest>,
) -> Result<impl IntoResponse> {
    let otp = state.service.verify_aadhaar_otp(request).await?;

    Ok((
        StatusCode::OK,
        Json(OtpResponse {
            message: "Aadhaar verified successfully.".to_string(),
            otp,
        }),
    ))
}

/// POST /data/generatePanOtp — PAN flow, step 1.
pub async fn generate_pan_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PanOtpRequest>,
) -> Result<impl IntoResponse> {
    let otp = state.service.request_pan_otp(request).await?;

    Ok((
        StatusCode::OK,
        Json(OtpResponse {
            message: "OTP generated and sent (simulated).".to_string(),
            otp,
        }),
    ))
}

/// POST /data/verifyPanOtp — PAN flow, step 2. Persists the record.
pub async fn verify_pan_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PanOtpVerifyRequest>,
) -> Result<impl IntoResponse> {
    let data = state.service.verify_pan_otp(request).await?;

    Ok((
        StatusCode::OK,
        Json(PanVerifiedResponse {
            message: "PAN verified successfully.".to_string(),
            data,
        }),
    ))
}

/// POST /data/checkAadhaar — read-only existence query.
pub async fn check_aadhaar_unique(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AadhaarUniqueRequest>,
) -> Result<impl IntoResponse> {
    let exists = state.service.check_aadhaar_unique(request).await?;
    Ok((StatusCode::OK, Json(ExistsResponse { exists })))
}

/// POST /data/checkPan — read-only existence query.
pub async fn check_pan_unique(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PanUniqueRequest>,
) -> Result<impl IntoResponse> {
    let exists = state.service.check_pan_unique(request).await?;
    Ok((StatusCode::OK, Json(ExistsResponse { exists })))
}
