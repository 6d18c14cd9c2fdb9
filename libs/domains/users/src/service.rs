use std::sync::Arc;
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{User, UserPatch, WriteOutcome};
use crate::repository::UserRepository;

/// Façade over a [`UserRepository`]; the seam handlers depend on
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &str) -> UserResult<Option<User>> {
        self.repository.load(id).await
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn create_user(&self, user: User) -> UserResult<WriteOutcome> {
        self.repository.create(user).await
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn update_user(&self, user: User) -> UserResult<WriteOutcome> {
        self.repository.update(user).await
    }

    #[instrument(skip(self, patch), fields(user_id = ?patch.get("id")))]
    pub async fn patch_user(&self, patch: UserPatch) -> UserResult<WriteOutcome> {
        self.repository.patch(patch).await
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &str) -> UserResult<WriteOutcome> {
        self.repository.delete(id).await
    }
}
