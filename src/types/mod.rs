// Common types for the Identity Registry Service
//
// Persisted record shape plus the request and response bodies of the REST
// API. JSON field names follow the original wire format (camelCase), with
// `adharNumber` kept as an input alias for `aadhaarNumber` so older
// clients keep working.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted identity record.
///
/// `aadhaar_number` is globally unique; `pan_number`, when present, is
/// globally unique as well. Records are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Server-assigned identifier
    pub id: Uuid,

    /// Holder name, 4-48 characters
    pub name: String,

    /// 12-digit Aadhaar number
    #[serde(rename = "aadhaarNumber")]
    pub aadhaar_number: String,

    /// Normalized 10-character PAN, if supplied
    #[serde(rename = "panNumber", skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
}

/// Candidate record handed to the store for creation.
///
/// All fields are optional at this level; the store enforces the schema
/// (presence, lengths, formats) and reports violations as persistence
/// errors, mirroring how the original delegated this to its ODM layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: Option<String>,

    #[serde(rename = "aadhaarNumber", alias = "adharNumber")]
    pub aadhaar_number: Option<String>,

    #[serde(rename = "panNumber")]
    pub pan_number: Option<String>,
}

/// Body of POST /data/generateOtp.
#[derive(Debug, Deserialize)]
pub struct AadhaarOtpRequest {
    pub aadhaar: Option<String>,
    pub name: Option<String>,
    pub consent: Option<bool>,
}

/// Body of POST /data/verifyOtp.
#[derive(Debug, Deserialize)]
pub struct AadhaarOtpVerifyRequest {
    pub aadhaar: Option<String>,
    pub otp: Option<String>,
}

/// Body of POST /data/generatePanOtp. `email` is accepted but unused;
/// delivery is simulated.
#[derive(Debug, Deserialize)]
pub struct PanOtpRequest {
    pub pan: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Body of POST /data/verifyPanOtp. `aadhaar` and `name` are carried into
/// the created record as supplied.
#[derive(Debug, Deserialize)]
pub struct PanOtpVerifyRequest {
    pub pan: Option<String>,
    pub otp: Option<String>,
    pub aadhaar: Option<String>,
    pub name: Option<String>,
}

/// Body of POST /data/checkAadhaar.
#[derive(Debug, Deserialize)]
pub struct AadhaarUniqueRequest {
    pub aadhaar: Option<String>,
}

/// Body of POST /data/checkPan.
#[derive(Debug, Deserialize)]
pub struct PanUniqueRequest {
    pub pan: Option<String>,
}

/// Plain informational response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// OTP issuance/confirmation response. The code is included because
/// delivery is simulated.
#[derive(Debug, Serialize, Deserialize)]
pub struct OtpResponse {
    pub message: String,
    pub otp: String,
}

/// Response of the direct-create endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub message: String,
    pub detail: IdentityRecord,
}

/// Response of the final PAN verification step.
#[derive(Debug, Serialize, Deserialize)]
pub struct PanVerifiedResponse {
    pub message: String,
    pub data: IdentityRecord,
}

/// Response of the uniqueness-check endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}
