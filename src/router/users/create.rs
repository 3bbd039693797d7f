use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ServerError;
use crate::error::Result;
use crate::user::{User, UserService};

/// Registration fields, stored as sent.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Body {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Handler to create user.
///
/// An unreadable body is a server fault here, like a missing field.
pub async fn handler(
    State(users): State<UserService>,
    body: std::result::Result<Json<Body>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let Json(body) = body.map_err(ServerError::UnreadableBody)?;
    let user = users.store(body.name, body.email, body.password).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::extract::FromRef;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;
    use crate::user::factory;
    use crate::*;

    #[tokio::test]
    async fn test_create_handler() {
        let state = router::state();
        let app = app(state.clone());

        let req_body = Body {
            name: Some(factory::name()),
            email: Some(factory::email()),
            password: Some(factory::password()),
        };
        let response = make_request(
            app,
            Method::POST,
            "/api",
            json!(req_body).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(raw.get("password").is_none());

        let body: User = serde_json::from_value(raw).unwrap();
        assert!(body.id > 0);
        assert_eq!(body.name, req_body.name);
        assert_eq!(body.email, req_body.email.unwrap());

        let stored = state.users.find_by_id(body.id).await.unwrap().unwrap();
        assert_ne!(stored.password, req_body.password.clone().unwrap());
        assert!(
            state
                .pwd
                .verify_password(req_body.password.unwrap(), &stored.password)
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_without_email() {
        let app = app(router::state());

        let req_body = json!({
            "name": factory::name(),
            "password": factory::password(),
        });
        let response =
            make_request(app, Method::POST, "/api", req_body.to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_with_null_email() {
        let app = app(router::state());

        let req_body = json!({
            "name": factory::name(),
            "email": null,
            "password": factory::password(),
        });
        let response =
            make_request(app, Method::POST, "/api", req_body.to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_with_existing_email() {
        let state = router::state();
        let app = app(state.clone());

        let user = factory::user()
            .email("joe@nothing.com")
            .create(&UserService::from_ref(&state))
            .await;

        let req_body = Body {
            name: Some(factory::name()),
            email: Some(user.email),
            password: Some(factory::password()),
        };
        let response = make_request(
            app,
            Method::POST,
            "/api",
            json!(req_body).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_without_password() {
        let app = app(router::state());

        let req_body = json!({
            "name": factory::name(),
            "email": factory::email(),
        });
        let response =
            make_request(app, Method::POST, "/api", req_body.to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_stores_email_as_sent() {
        let state = router::state();
        let app = app(state.clone());

        let req_body = Body {
            name: Some(factory::name()),
            email: Some("not-an-email".into()),
            password: Some(factory::password()),
        };
        let response = make_request(
            app,
            Method::POST,
            "/api",
            json!(req_body).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.email, "not-an-email");
        assert!(state.users.find_by_id(body.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_with_wrongly_typed_email() {
        let app = app(router::state());

        let req_body = json!({
            "name": factory::name(),
            "email": 123,
            "password": factory::password(),
        });
        let response =
            make_request(app, Method::POST, "/api", req_body.to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_with_malformed_body() {
        let app = app(router::state());

        let response =
            make_request(app, Method::POST, "/api", "{\"email\":".into()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
