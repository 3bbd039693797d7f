//! PostgreSQL implementation of [`UserRepository`].

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{Result, ServerError};
use crate::user::{NewUser, User, UserChanges, UserRepository};

const RETURNING: &str = "id, name, email, password, created_at, updated_at";

/// PostgreSQL user repository.
#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new [`PgUserRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turn unique constraint violations into [`ServerError::EmailTaken`].
fn map_unique(err: sqlx::Error) -> ServerError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => ServerError::EmailTaken,
        _ => ServerError::Sql(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {RETURNING}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let query = format!("SELECT {RETURNING} FROM users WHERE id = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let query = format!(
            r#"UPDATE users
                SET name = COALESCE($2, name), password = COALESCE($3, password), updated_at = NOW()
                WHERE id = $1
                RETURNING {RETURNING}"#
        );

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.password)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
