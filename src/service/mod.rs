// Verification service for the Identity Registry Service
//
// Orchestrates the validators, the two OTP stores and the record store to
// implement the two sequential flows: Aadhaar (request OTP, verify OTP)
// followed by PAN (request OTP, verify OTP and persist). Persistence
// happens exactly once, at the end of the PAN flow, or through the
// OTP-less direct-create operation.

use crate::error::{RegistryError, Result};
use crate::otp::{OtpStore, OtpVerifyError};
use crate::storage::{RecordField, RecordStore};
use crate::types::{
    AadhaarOtpRequest, AadhaarOtpVerifyRequest, AadhaarUniqueRequest, IdentityRecord, NewRecord,
    PanOtpRequest, PanOtpVerifyRequest, PanUniqueRequest,
};
use crate::validation;
use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

/// Strip interior whitespace so "2345 6789 0124" and "234567890124" refer
/// to the same OTP entry and record.
fn canonical_aadhaar(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Show only the tail of a government identifier in log output.
fn mask(value: &str) -> String {
    if value.len() <= 4 {
        return "****".to_string();
    }
    format!("****{}", &value[value.len() - 4..])
}

/// The identity verification state machine.
///
/// Holds one OTP store per identifier type. OTP state is process-local;
/// the record store is the only durable collaborator.
pub struct VerificationService {
    records: Arc<dyn RecordStore>,
    aadhaar_otp: OtpStore,
    pan_otp: OtpStore,
}

impl VerificationService {
    /// Create a service with wall-clock OTP stores sharing one TTL.
    pub fn new(records: Arc<dyn RecordStore>, otp_ttl: Duration) -> Self {
        Self {
            records,
            aadhaar_otp: OtpStore::new(otp_ttl),
            pan_otp: OtpStore::new(otp_ttl),
        }
    }

    /// Create a service with caller-supplied OTP stores. Used by tests to
    /// inject manual clocks.
    pub fn with_otp_stores(
        records: Arc<dyn RecordStore>,
        aadhaar_otp: OtpStore,
        pan_otp: OtpStore,
    ) -> Self {
        Self {
            records,
            aadhaar_otp,
            pan_otp,
        }
    }

    /// Direct record insertion, bypassing OTP verification entirely.
    /// Only store-level schema constraints apply.
    pub async fn create_record(&self, record: NewRecord) -> Result<IdentityRecord> {
        let created = self.records.create(record).await?;
        info!("Record {} created via direct insert", created.id);
        Ok(created)
    }

    /// Aadhaar flow, step 1: validate and issue an OTP.
    pub async fn request_aadhaar_otp(&self, req: AadhaarOtpRequest) -> Result<String> {
        let (aadhaar, _name) = match (&req.aadhaar, &req.name, req.consent.unwrap_or(false)) {
            (Some(aadhaar), Some(name), true) if !aadhaar.is_empty() && !name.is_empty() => {
                (aadhaar.clone(), name.clone())
            }
            _ => {
                return Err(RegistryError::MissingFields(
                    "Missing required fields.".to_string(),
                ))
            }
        };

        if !validation::is_valid_aadhaar(&aadhaar) {
            return Err(RegistryError::InvalidAadhaar);
        }
        let aadhaar = canonical_aadhaar(&aadhaar);

        if self.records.exists(RecordField::Aadhaar, &aadhaar).await? {
            warn!("Aadhaar {} already registered", mask(&aadhaar));
            return Err(RegistryError::Conflict(
                "Aadhaar already registered.".to_string(),
            ));
        }

        let otp = self.aadhaar_otp.generate(&aadhaar);
        info!("Generated OTP for Aadhaar {}", mask(&aadhaar));
        Ok(otp)
    }

    /// Aadhaar flow, step 2: consume the OTP. Nothing is persisted here;
    /// the Aadhaar is only "claimed" in the OTP sense.
    pub async fn verify_aadhaar_otp(&self, req: AadhaarOtpVerifyRequest) -> Result<String> {
        let (aadhaar, otp) = match (&req.aadhaar, &req.otp) {
            (Some(aadhaar), Some(otp)) if !aadhaar.is_empty() && !otp.is_empty() => {
                (aadhaar.clone(), otp.clone())
            }
            _ => {
                return Err(RegistryError::MissingFields(
                    "Missing Aadhaar or OTP.".to_string(),
                ))
            }
        };

        let aadhaar = canonical_aadhaar(&aadhaar);
        self.aadhaar_otp
            .verify(&aadhaar, &otp)
            .map_err(|e| match e {
                OtpVerifyError::NotFound => {
                    RegistryError::OtpNotFound("No OTP generated for this Aadhaar.".to_string())
                }
                OtpVerifyError::Expired => RegistryError::OtpExpired,
                OtpVerifyError::Mismatch => RegistryError::OtpMismatch,
            })?;

        info!("Aadhaar {} verified", mask(&aadhaar));
        Ok(otp)
    }

    /// PAN flow, step 1: validate and issue an OTP keyed by the normalized
    /// PAN. `email` in the request is accepted but unused.
    pub async fn request_pan_otp(&self, req: PanOtpRequest) -> Result<String> {
        let (pan, _name) = match (&req.pan, &req.name) {
            (Some(pan), Some(name)) if !pan.is_empty() && !name.is_empty() => {
                (pan.clone(), name.clone())
            }
            _ => {
                return Err(RegistryError::MissingFields(
                    "Missing required fields.".to_string(),
                ))
            }
        };

        let pan = validation::normalize_pan(&pan);
        if !validation::is_valid_pan(&pan) {
            return Err(RegistryError::InvalidPan);
        }

        if self.records.exists(RecordField::Pan, &pan).await? {
            warn!("PAN {} already registered", mask(&pan));
            return Err(RegistryError::Conflict(
                "PAN already registered.".to_string(),
            ));
        }

        let otp = self.pan_otp.generate(&pan);
        info!("Generated OTP for PAN {}", mask(&pan));
        Ok(otp)
    }

    /// PAN flow, step 2: consume the OTP and persist the identity record.
    ///
    /// This is the single persistence point of the flow. The `aadhaar` and
    /// `name` values are taken from the request as supplied; the OTP entry
    /// is consumed before the create attempt, so a persistence failure
    /// cannot be retried with the same code.
    pub async fn verify_pan_otp(&self, req: PanOtpVerifyRequest) -> Result<IdentityRecord> {
        let (pan, otp) = match (&req.pan, &req.otp) {
            (Some(pan), Some(otp)) if !pan.is_empty() && !otp.is_empty() => {
                (pan.clone(), otp.clone())
            }
            _ => {
                return Err(RegistryError::MissingFields(
                    "Missing PAN or OTP.".to_string(),
                ))
            }
        };

        let pan = validation::normalize_pan(&pan);
        self.pan_otp.verify(&pan, &otp).map_err(|e| match e {
            OtpVerifyError::NotFound => {
                RegistryError::OtpNotFound("No OTP generated for this PAN.".to_string())
            }
            OtpVerifyError::Expired => RegistryError::OtpExpired,
            OtpVerifyError::Mismatch => RegistryError::OtpMismatch,
        })?;

        let created = self
            .records
            .create(NewRecord {
                name: req.name,
                aadhaar_number: req.aadhaar,
                pan_number: Some(pan.clone()),
            })
            .await?;

        info!("PAN {} verified, record {} created", mask(&pan), created.id);
        Ok(created)
    }

    /// Read-only existence query by Aadhaar. Malformed input is an error,
    /// not a boolean.
    pub async fn check_aadhaar_unique(&self, req: AadhaarUniqueRequest) -> Result<bool> {
        let aadhaar = req.aadhaar.unwrap_or_default();
        if !validation::is_valid_aadhaar(&aadhaar) {
            return Err(RegistryError::InvalidAadhaar);
        }
        let aadhaar = canonical_aadhaar(&aadhaar);
        self.records.exists(RecordField::Aadhaar, &aadhaar).await
    }

    /// Read-only existence query by PAN.
    pub async fn check_pan_unique(&self, req: PanUniqueRequest) -> Result<bool> {
        let pan = validation::normalize_pan(&req.pan.unwrap_or_default());
        if !validation::is_valid_pan(&pan) {
            return Err(RegistryError::InvalidPan);
        }
        self.records.exists(RecordField::Pan, &pan).await
    }
}
