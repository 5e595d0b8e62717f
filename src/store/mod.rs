pub mod catalog;
pub mod orders;
pub mod users;

use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use crate::domain::errors::DomainError;

pub(crate) fn read_guard<'a, T>(
    lock: &'a std::sync::RwLock<T>,
) -> Result<RwLockReadGuard<'a, T>, DomainError> {
    lock.read()
        .map_err(|_| DomainError::Internal("store lock poisoned".to_string()))
}

pub(crate) fn write_guard<'a, T>(
    lock: &'a std::sync::RwLock<T>,
) -> Result<RwLockWriteGuard<'a, T>, DomainError> {
    lock.write()
        .map_err(|_| DomainError::Internal("store lock poisoned".to_string()))
}
