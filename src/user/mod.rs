mod memory;
mod postgres;
mod repository;
mod service;

#[cfg(test)]
pub mod factory;

pub use memory::*;
pub use postgres::*;
pub use repository::*;
pub use service::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User about to be inserted. `password` is already hashed.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Mutable fields of a [`User`]. `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password: Option<String>,
}
