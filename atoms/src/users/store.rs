use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::model::{UpdateUserPayload, User};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(String),
}

/// In-memory user records keyed by id.
///
/// Every operation holds the lock only for the map access itself, so readers
/// always observe a consistent snapshot and writers never interleave.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Mutex<HashMap<String, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    // No critical section can leave the map half-updated, so a poisoned
    // lock still guards valid data.
    fn users(&self) -> MutexGuard<'_, HashMap<String, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, name: impl Into<String>, email: impl Into<String>) -> User {
        let user = User::new(name, email);
        self.users().insert(user.id.clone(), user.clone());
        user
    }

    /// Snapshot of every stored record, in no particular order.
    pub fn list(&self) -> Vec<User> {
        self.users().values().cloned().collect()
    }

    pub fn get(&self, user_id: &str) -> Result<User, StoreError> {
        self.users()
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }

    pub fn update(&self, user_id: &str, patch: &UpdateUserPayload) -> Result<User, StoreError> {
        let mut users = self.users();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        user.apply(patch);
        Ok(user.clone())
    }

    pub fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.users()
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.users().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users().is_empty()
    }
}
