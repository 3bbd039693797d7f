//! Get a user by its ID.

use axum::Json;
use axum::extract::{Path, State};

use crate::ServerError;
use crate::user::{User, UserService};

pub async fn handler(
    State(users): State<UserService>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ServerError> {
    Ok(Json(users.get(user_id).await?))
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRef;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    use super::*;
    use crate::user::factory;
    use crate::*;

    #[tokio::test]
    async fn test_get_user_handler() {
        let state = router::state();
        let app = app(state.clone());

        let user = factory::user()
            .email("snow@nothing.com")
            .create(&UserService::from_ref(&state))
            .await;

        let path = format!("/api/{}", user.id);
        let response = make_request(app, Method::GET, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.id, user.id);
        assert_eq!(body.name, user.name);
        assert_eq!(body.email, "snow@nothing.com");
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let app = app(router::state());

        let response =
            make_request(app, Method::GET, "/api/0", String::default()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_with_invalid_id() {
        let app = app(router::state());

        let response =
            make_request(app, Method::GET, "/api/snow", String::default()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
