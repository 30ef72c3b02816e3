// Error handling module for the Identity Registry Service
//
// This module defines the error types used throughout the service and their
// translation into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::io;
use std::result;
use thiserror::Error;

/// Result type for Identity Registry operations
pub type Result<T> = result::Result<T, RegistryError>;

/// Error type for Identity Registry operations
#[derive(Debug, Error, Clone)]
pub enum RegistryError {
    /// One or more required request fields are absent
    #[error("{0}")]
    MissingFields(String),

    /// Aadhaar number failed format or checksum validation
    #[error("Invalid Aadhaar number.")]
    InvalidAadhaar,

    /// PAN failed format validation
    #[error("Invalid PAN number.")]
    InvalidPan,

    /// Identifier is already registered
    #[error("{0}")]
    Conflict(String),

    /// No OTP was generated for the supplied identifier
    #[error("{0}")]
    OtpNotFound(String),

    /// OTP exists but its validity window has passed
    #[error("OTP expired. Please request a new one.")]
    OtpExpired,

    /// Supplied OTP does not match the generated code
    #[error("Invalid OTP.")]
    OtpMismatch,

    /// Record creation failed (schema or uniqueness violation)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// Unexpected internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Machine-readable error code included in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::MissingFields(_) => "MISSING_FIELDS",
            RegistryError::InvalidAadhaar => "INVALID_AADHAAR",
            RegistryError::InvalidPan => "INVALID_PAN",
            RegistryError::Conflict(_) => "CONFLICT",
            RegistryError::OtpNotFound(_) => "OTP_NOT_FOUND",
            RegistryError::OtpExpired => "OTP_EXPIRED",
            RegistryError::OtpMismatch => "OTP_MISMATCH",
            RegistryError::Persistence(_) => "PERSISTENCE_ERROR",
            RegistryError::Config(_) => "CONFIG_ERROR",
            RegistryError::Database(_) => "DATABASE_ERROR",
            RegistryError::Io(_) => "IO_ERROR",
            RegistryError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            RegistryError::MissingFields(_)
            | RegistryError::InvalidAadhaar
            | RegistryError::InvalidPan
            | RegistryError::OtpNotFound(_)
            | RegistryError::OtpExpired
            | RegistryError::OtpMismatch
            | RegistryError::Persistence(_) => StatusCode::BAD_REQUEST,
            RegistryError::Conflict(_) => StatusCode::CONFLICT,
            RegistryError::Config(_)
            | RegistryError::Database(_)
            | RegistryError::Io(_)
            | RegistryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implement IntoResponse for RegistryError so it can be returned directly
/// from handlers. The body carries both a human-readable message and a
/// machine-readable code.
impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "message": self.to_string(),
            "error": self.code(),
        }));

        (status, body).into_response()
    }
}

impl From<rusqlite::Error> for RegistryError {
    fn from(err: rusqlite::Error) -> Self {
        RegistryError::Database(err.to_string())
    }
}

impl From<io::Error> for RegistryError {
    fn from(err: io::Error) -> Self {
        RegistryError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for RegistryError {
    fn from(err: config::ConfigError) -> Self {
        RegistryError::Config(err.to_string())
    }
}
