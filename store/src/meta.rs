//! Metadata storage trait.

use crate::StoreError;

/// Key-value store for internal bookkeeping (schema version and the like).
pub trait MetaStore {
    /// Store a metadata value.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value.
    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Current database schema version, 0 for a fresh database.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    /// Record the database schema version.
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
