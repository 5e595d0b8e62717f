//! Key-value persistence of the top-level collections.
//!
//! The stores are the source of truth while the process runs; each mutation
//! is followed by a write-back of the affected collection. The core only
//! needs read-your-writes within a session, so the backend can be a JSON
//! file on disk or an in-memory map for tests.

pub mod json_file;

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::domain::errors::DomainError;

pub const USERS_KEY: &str = "campus_market_users";
pub const PRODUCTS_KEY: &str = "campus_market_products";
pub const ORDERS_KEY: &str = "campus_market_orders";
pub const SESSION_KEY: &str = "campus_market_session";

pub trait KeyValueStore: Send + Sync + 'static {
    fn load(&self, key: &str) -> Result<Option<Value>, DomainError>;
    fn save(&self, key: &str, value: &Value) -> Result<(), DomainError>;
    fn remove(&self, key: &str) -> Result<(), DomainError>;
}

/// Backend for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let map = self
            .entries
            .read()
            .map_err(|_| DomainError::Internal("persistence lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), DomainError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| DomainError::Internal("persistence lock poisoned".to_string()))?;
        map.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| DomainError::Internal("persistence lock poisoned".to_string()))?;
        map.remove(key);
        Ok(())
    }
}
