use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::columns::{PatchSet, PatchValue};
use crate::error::UserResult;
use crate::models::{User, UserPatch, WriteOutcome};

/// Data access for the `users` table
///
/// Reads return `Option`/`Vec` and only fail on store errors. Writes report
/// what happened through [`WriteOutcome`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, in store order
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn load(&self, id: &str) -> UserResult<Option<User>>;

    /// Insert; a taken id yields `Conflict`
    async fn create(&self, user: User) -> UserResult<WriteOutcome>;

    /// Replace every column of the row keyed by `user.id`
    async fn update(&self, user: User) -> UserResult<WriteOutcome>;

    /// Assign only the columns present in `fields`; `fields["id"]` selects the row
    async fn patch(&self, fields: UserPatch) -> UserResult<WriteOutcome>;

    async fn delete(&self, id: &str) -> UserResult<WriteOutcome>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn load(&self, id: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn create(&self, user: User) -> UserResult<WriteOutcome> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Ok(WriteOutcome::Conflict);
        }

        tracing::info!(user_id = %user.id, "Created user");
        users.insert(user.id.clone(), user);
        Ok(WriteOutcome::Applied(1))
    }

    async fn update(&self, user: User) -> UserResult<WriteOutcome> {
        let mut users = self.users.write().await;

        match users.get_mut(&user.id) {
            Some(existing) => {
                tracing::info!(user_id = %user.id, "Updated user");
                *existing = user;
                Ok(WriteOutcome::Applied(1))
            }
            None => Ok(WriteOutcome::NotFound),
        }
    }

    async fn patch(&self, fields: UserPatch) -> UserResult<WriteOutcome> {
        let set = PatchSet::from_fields(&fields)?;
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(&set.key) else {
            return Ok(WriteOutcome::NotFound);
        };

        for (column, value) in set.assignments {
            match (column.name, value) {
                ("username", PatchValue::Text(v)) => user.username = v,
                ("email", PatchValue::Text(v)) => user.email = v,
                ("phone", PatchValue::Text(v)) => user.phone = v,
                ("date_of_birth", PatchValue::Date(v)) => user.date_of_birth = v,
                (name, _) => tracing::warn!(column = name, "No in-memory field for column"),
            }
        }

        tracing::info!(user_id = %set.key, "Patched user");
        Ok(WriteOutcome::Applied(1))
    }

    async fn delete(&self, id: &str) -> UserResult<WriteOutcome> {
        let mut users = self.users.write().await;

        if users.remove(id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(WriteOutcome::Applied(1))
        } else {
            Ok(WriteOutcome::NotFound)
        }
    }
}
