// In-memory record store
//
// Non-persistent backend for development and tests. All records are lost
// when the process exits. Uniqueness is enforced under a single write
// lock, so create is atomic with respect to its duplicate checks.

use crate::error::{RegistryError, Result};
use crate::types::{IdentityRecord, NewRecord};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{validate_record, RecordField, RecordStore};

/// Records held in a process-local map keyed by id.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<Uuid, IdentityRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn exists(&self, field: RecordField, value: &str) -> Result<bool> {
        let records = self.records.read();
        let found = records.values().any(|r| match field {
            RecordField::Aadhaar => r.aadhaar_number == value,
            RecordField::Pan => r.pan_number.as_deref() == Some(value),
        });
        Ok(found)
    }

    async fn create(&self, record: NewRecord) -> Result<IdentityRecord> {
        let validated = validate_record(&record)?;

        let mut records = self.records.write();

        if records
            .values()
            .any(|r| r.aadhaar_number == validated.aadhaar_number)
        {
            return Err(RegistryError::Persistence(
                "duplicate Aadhaar number".to_string(),
            ));
        }
        if let Some(pan) = &validated.pan_number {
            if records
                .values()
                .any(|r| r.pan_number.as_deref() == Some(pan.as_str()))
            {
                return Err(RegistryError::Persistence(
                    "duplicate PAN number".to_string(),
                ));
            }
        }

        let stored = IdentityRecord {
            id: Uuid::new_v4(),
            name: validated.name,
            aadhaar_number: validated.aadhaar_number,
            pan_number: validated.pan_number,
        };
        records.insert(stored.id, stored.clone());
        debug!("Record created with id {}", stored.id);

        Ok(stored)
    }
}
