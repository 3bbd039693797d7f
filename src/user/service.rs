use std::sync::Arc;

use axum::extract::FromRef;

use crate::AppState;
use crate::crypto::PasswordManager;
use crate::error::{Result, ServerError};
use crate::user::{NewUser, User, UserChanges, UserRepository};

/// User manager.
#[derive(Clone)]
pub struct UserService {
    pub repo: Arc<dyn UserRepository>,
    pub pwd: Arc<PasswordManager>,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> UserService {
        UserService::new(Arc::clone(&state.users), Arc::clone(&state.pwd))
    }
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(repo: Arc<dyn UserRepository>, pwd: Arc<PasswordManager>) -> Self {
        Self { repo, pwd }
    }

    /// Register a new user.
    ///
    /// `email` and `password` are not checked for presence by callers, a
    /// missing one is a server fault.
    pub async fn store(
        &self,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<User> {
        let email = email.ok_or(ServerError::MissingField("email"))?;
        let password = password.ok_or(ServerError::MissingField("password"))?;

        let user = self
            .repo
            .insert(NewUser {
                name,
                email,
                password: self.pwd.hash_password(password)?,
            })
            .await?;

        tracing::debug!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Update `name` and/or `password` of an existing user.
    pub async fn update(
        &self,
        id: i64,
        name: Option<String>,
        password: Option<String>,
    ) -> Result<User> {
        let password = password
            .map(|password| self.pwd.hash_password(password))
            .transpose()?;

        self.repo
            .update(id, UserChanges { name, password })
            .await?
            .ok_or(ServerError::UserNotFound)
    }

    /// Find user using `id` field.
    pub async fn get(&self, id: i64) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServerError::UserNotFound)
    }

    /// Delete user forever.
    pub async fn destroy(&self, id: i64) -> Result<()> {
        if self.repo.delete(id).await? {
            tracing::debug!(user_id = id, "user deleted");
            Ok(())
        } else {
            Err(ServerError::UserNotFound)
        }
    }
}
