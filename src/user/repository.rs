//! Handle storage requests.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, ServerError};
use crate::user::User;

/// Keyed persistence capability for [`User`] records.
///
/// Storage calls are synchronous and in-process. Implementations hold
/// no business rules: `save` never checks uniqueness, that is the
/// caller's concern via [`UserRepository::insert_if_absent`].
pub trait UserRepository: Send + Sync {
    /// Find a user by email.
    ///
    /// Fails with [`ServerError::NotFound`] when absent; any
    /// underlying-store fault is [`ServerError::Internal`].
    fn get(&self, email: &str) -> Result<User>;

    /// Insert or overwrite the record keyed by the user's email.
    fn save(&self, user: &User) -> Result<()>;

    /// Insert the record only when no user owns its email yet.
    ///
    /// Returns `Ok(false)` without writing when the email is taken.
    /// The check and the write are a single atomic step, so exactly
    /// one concurrent insert for a given email can win.
    fn insert_if_absent(&self, user: &User) -> Result<bool>;
}

/// In-memory [`UserRepository`] over a shared map.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    store: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    fn get(&self, email: &str) -> Result<User> {
        let store = self.store.read().map_err(poisoned)?;
        store.get(email).cloned().ok_or(ServerError::NotFound)
    }

    fn save(&self, user: &User) -> Result<()> {
        let mut store = self.store.write().map_err(poisoned)?;
        store.insert(user.email.clone(), user.clone());
        Ok(())
    }

    fn insert_if_absent(&self, user: &User) -> Result<bool> {
        // The write lock covers both the check and the insert.
        let mut store = self.store.write().map_err(poisoned)?;
        if store.contains_key(&user.email) {
            return Ok(false);
        }

        store.insert(user.email.clone(), user.clone());
        Ok(true)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> ServerError {
    ServerError::Internal {
        details: "user store lock poisoned".to_owned(),
    }
}
