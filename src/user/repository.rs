//! User persistence port.

use async_trait::async_trait;

use crate::error::Result;
use crate::user::{NewUser, User, UserChanges};

/// Record store holding [`User`] rows.
///
/// Every method is a single atomic operation on one row.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned `id`.
    ///
    /// Fails with [`ServerError::EmailTaken`](crate::ServerError::EmailTaken)
    /// if the email is already stored.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Find a user by `id`.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Apply `changes` and return the updated user, `None` if absent.
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;

    /// Delete a user. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}
