//! Update user data.
//!
//! Only `name` and `password` can change; `email` is kept as registered.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::router::Valid;
use crate::user::{User, UserService};
use crate::ServerError;

#[derive(Debug, Default, Validate, Serialize, Deserialize)]
pub struct Body {
    #[validate(length(max = 255, message = "Name must be at most 255 characters long."))]
    pub name: Option<String>,
    pub password: Option<String>,
}

pub async fn handler(
    State(users): State<UserService>,
    Path(user_id): Path<i64>,
    body: Option<Valid<Body>>,
) -> Result<Json<User>, ServerError> {
    let body = body.map(|Valid(body)| body).unwrap_or_default();
    let user = users.update(user_id, body.name, body.password).await?;

    Ok(Json(user))
}
