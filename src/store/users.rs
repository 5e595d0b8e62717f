//! Registered accounts and their activity counters.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::user::{Role, Schedule, User};

use super::{read_guard, write_guard};

#[derive(Default)]
pub struct UserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&self, users: Vec<User>) -> Result<(), DomainError> {
        let mut map = write_guard(&self.users)?;
        *map = users.into_iter().map(|u| (u.id, u)).collect();
        Ok(())
    }

    pub fn insert(&self, user: User) -> Result<(), DomainError> {
        let mut map = write_guard(&self.users)?;
        map.insert(user.id, user);
        Ok(())
    }

    pub fn get(&self, user_id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(read_guard(&self.users)?.get(&user_id).cloned())
    }

    pub fn require(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.get(user_id)?.ok_or(DomainError::NotFound)
    }

    pub fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(read_guard(&self.users)?.values().cloned().collect())
    }

    pub fn remove(&self, user_id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(write_guard(&self.users)?.remove(&user_id))
    }

    /// Bump the counter on each state-changing action. Missing users are a
    /// no-op: activity tracking never fails an operation.
    pub fn track_activity(&self, user_id: Uuid) -> Result<(), DomainError> {
        let mut map = write_guard(&self.users)?;
        if let Some(user) = map.get_mut(&user_id) {
            user.activity_count += 1;
        }
        Ok(())
    }

    /// The delete-store demotion, SELLER back to BUYER.
    pub fn demote_to_buyer(&self, user_id: Uuid) -> Result<User, DomainError> {
        let mut map = write_guard(&self.users)?;
        let user = map.get_mut(&user_id).ok_or(DomainError::NotFound)?;
        if user.role != Role::Seller {
            return Err(DomainError::Validation(
                "only sellers have a store to delete".to_string(),
            ));
        }
        user.role = Role::Buyer;
        Ok(user.clone())
    }

    pub fn set_schedule(&self, user_id: Uuid, schedule: Schedule) -> Result<User, DomainError> {
        let mut map = write_guard(&self.users)?;
        let user = map.get_mut(&user_id).ok_or(DomainError::NotFound)?;
        user.schedule = Some(schedule);
        Ok(user.clone())
    }

    /// Best-effort zone attachment; `None` leaves the zone unset.
    pub fn set_preferred_zone(
        &self,
        user_id: Uuid,
        zone: Option<String>,
    ) -> Result<User, DomainError> {
        let mut map = write_guard(&self.users)?;
        let user = map.get_mut(&user_id).ok_or(DomainError::NotFound)?;
        user.preferred_zone = zone;
        Ok(user.clone())
    }
}
