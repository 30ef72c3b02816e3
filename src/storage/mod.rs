// Storage module for the Identity Registry Service
//
// The rest of the service talks to persistence only through the
// `RecordStore` trait: an existence check by identifier and a create
// operation. Schema constraints (field presence, lengths, formats) and
// uniqueness are enforced here, at the store level, not by the
// verification service.

use crate::error::{RegistryError, Result};
use crate::types::{IdentityRecord, NewRecord};
use crate::validation;
use async_trait::async_trait;

/// In-memory record store
pub mod memory_storage;
/// SQLite-backed record store
pub mod sql_storage;

pub use memory_storage::MemoryRecordStore;
pub use sql_storage::SqliteRecordStore;

/// The two indexed identifier columns a record can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Aadhaar,
    Pan,
}

/// Persistence contract required by the verification service.
///
/// Implementations must enforce the record schema and the uniqueness of
/// both identifier fields; violations surface as
/// `RegistryError::Persistence`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a record with the given identifier value exists.
    async fn exists(&self, field: RecordField, value: &str) -> Result<bool>;

    /// Insert a record, assigning it an id. Fails on schema violations and
    /// on duplicate Aadhaar or PAN numbers.
    async fn create(&self, record: NewRecord) -> Result<IdentityRecord>;
}

/// Validated, normalized field values ready for insertion.
pub(crate) struct ValidatedRecord {
    pub name: String,
    pub aadhaar_number: String,
    pub pan_number: Option<String>,
}

/// Store-level schema validation shared by all backends.
///
/// Mirrors the original persisted schema: name required (4-48 chars),
/// aadhaar required (exactly 12 digits, no checksum at this level), pan
/// optional (uppercased, fixed letter/digit pattern).
pub(crate) fn validate_record(record: &NewRecord) -> Result<ValidatedRecord> {
    let name = record
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RegistryError::Persistence("name is required".to_string()))?;
    let len = name.chars().count();
    if !(4..=48).contains(&len) {
        return Err(RegistryError::Persistence(
            "name must be between 4 and 48 characters".to_string(),
        ));
    }

    let aadhaar = record
        .aadhaar_number
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RegistryError::Persistence("aadhaarNumber is required".to_string()))?;
    if aadhaar.len() != 12 || !aadhaar.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RegistryError::Persistence(format!(
            "{} is not a valid 12-digit Aadhaar number",
            aadhaar
        )));
    }

    let pan = match record.pan_number.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let normalized = validation::normalize_pan(raw);
            if !validation::is_valid_pan(&normalized) {
                return Err(RegistryError::Persistence(format!(
                    "{} is not a valid PAN number",
                    raw
                )));
            }
            Some(normalized)
        }
    };

    Ok(ValidatedRecord {
        name: name.to_string(),
        aadhaar_number: aadhaar.to_string(),
        pan_number: pan,
    })
}
