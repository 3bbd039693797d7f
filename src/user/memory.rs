//! In-process [`UserRepository`], used when no PostgreSQL is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{Result, ServerError};
use crate::user::{NewUser, User, UserChanges, UserRepository};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, User>,
}

/// Memory-backed user repository.
///
/// Ids start at `1` and are never reused.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    table: RwLock<Table>,
}

impl MemoryUserRepository {
    /// Create an empty [`MemoryUserRepository`].
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|row| row.email == user.email) {
            return Err(ServerError::EmailTaken);
        }

        table.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.last_id,
            name: user.name,
            email: user.email,
            password: user.password,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let mut table = self.table.write().await;

        Ok(table.rows.get_mut(&id).map(|user| {
            if let Some(name) = changes.name {
                user.name = Some(name);
            }
            if let Some(password) = changes.password {
                user.password = password;
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
