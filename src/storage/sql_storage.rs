// SQLite-backed record store
//
// Durable backend for single-node deployments. Connections are opened per
// operation and the blocking rusqlite calls run on the tokio blocking
// pool. Uniqueness of both identifier columns is enforced by the database
// schema.

use crate::error::{RegistryError, Result};
use crate::types::{IdentityRecord, NewRecord};
use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use super::{validate_record, RecordField, RecordStore};

pub struct SqliteRecordStore {
    db_path: PathBuf,
}

impl SqliteRecordStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Create the table and indexes if they do not exist. Must be called
    /// once before the store is used.
    pub fn initialize_schema(&self) -> Result<()> {
        debug!("Initializing SQLite schema at {:?}", self.db_path);

        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS identity_records (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                aadhaar_number TEXT NOT NULL UNIQUE,
                pan_number TEXT UNIQUE
            )",
            [],
        )?;

        Ok(())
    }

    fn column(field: RecordField) -> &'static str {
        match field {
            RecordField::Aadhaar => "aadhaar_number",
            RecordField::Pan => "pan_number",
        }
    }
}

/// Map a rusqlite failure to the service error space, turning UNIQUE
/// violations into the generic persistence error the API reports for
/// duplicate identifiers.
fn map_sqlite_error(err: rusqlite::Error) -> RegistryError {
    if let rusqlite::Error::SqliteFailure(e, ref msg) = err {
        if e.code == ErrorCode::ConstraintViolation {
            let detail = msg.clone().unwrap_or_else(|| "unique constraint".to_string());
            return RegistryError::Persistence(format!("duplicate identifier: {}", detail));
        }
    }
    RegistryError::Database(err.to_string())
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn exists(&self, field: RecordField, value: &str) -> Result<bool> {
        let db_path = self.db_path.clone();
        let value = value.to_string();
        let column = Self::column(field);

        tokio::task::spawn_blocking(move || -> Result<bool> {
            let conn = Connection::open(&db_path)?;
            let sql = format!(
                "SELECT EXISTS(SELECT 1 FROM identity_records WHERE {} = ?)",
                column
            );
            let found: bool = conn.query_row(&sql, params![value], |row| row.get(0))?;
            Ok(found)
        })
        .await
        .map_err(|e| RegistryError::Internal(format!("blocking task failed: {}", e)))?
    }

    async fn create(&self, record: NewRecord) -> Result<IdentityRecord> {
        let validated = validate_record(&record)?;
        let db_path = self.db_path.clone();

        let stored = IdentityRecord {
            id: Uuid::new_v4(),
            name: validated.name,
            aadhaar_number: validated.aadhaar_number,
            pan_number: validated.pan_number,
        };

        let to_insert = stored.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = Connection::open(&db_path)?;
            conn.execute(
                "INSERT INTO identity_records (id, name, aadhaar_number, pan_number)
                 VALUES (?, ?, ?, ?)",
                params![
                    to_insert.id.to_string(),
                    to_insert.name,
                    to_insert.aadhaar_number,
                    to_insert.pan_number,
                ],
            )
            .map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
        .map_err(|e| RegistryError::Internal(format!("blocking task failed: {}", e)))??;

        debug!("Record created with id {}", stored.id);
        Ok(stored)
    }
}
