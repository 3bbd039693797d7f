//! HTTP routes.
pub mod status;
pub mod users;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, OptionalFromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::ServerError;

/// JSON body validated with [`Validate`] before reaching handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        value.validate()?;
        Ok(Valid(value))
    }
}

/// An empty body gives `None`, whatever the content type.
impl<T, S> OptionalFromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(JsonRejection::from)?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        value.validate()?;
        Ok(Some(Valid(value)))
    }
}

/// State with memory storage and cheap hashing.
#[cfg(test)]
pub fn state() -> crate::AppState {
    use std::sync::Arc;

    let argon2 = crate::config::Argon2 {
        memory_cost: 1024,
        iterations: 1,
        parallelism: 1,
        hash_length: 32,
    };

    crate::AppState {
        config: Arc::new(crate::config::Configuration::default()),
        users: Arc::new(crate::user::MemoryUserRepository::new()),
        pwd: Arc::new(
            crate::crypto::PasswordManager::new(Some(argon2))
                .expect("test argon2 params are valid"),
        ),
    }
}
