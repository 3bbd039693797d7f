//! Delete user from database.

use axum::extract::{Path, State};

use crate::user::UserService;
use crate::ServerError;

pub async fn handler(
    State(users): State<UserService>,
    Path(user_id): Path<i64>,
) -> Result<(), ServerError> {
    users.destroy(user_id).await
}

#[cfg(test)]
pub(super) mod tests {
    use axum::extract::FromRef;
    use axum::http::{Method, StatusCode};

    use super::*;
    use crate::user::factory;
    use crate::*;

    #[tokio::test]
    async fn test_delete_handler() {
        let state = router::state();
        let app = app(state.clone());

        let user = factory::user()
            .email("stark@nothing.com")
            .create(&UserService::from_ref(&state))
            .await;

        let path = format!("/api/{}", user.id);
        let response = make_request(
            app.clone(),
            Method::DELETE,
            &path,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        // User must be deleted.
        let response =
            make_request(app, Method::GET, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let app = app(router::state());

        let response =
            make_request(app, Method::DELETE, "/api/0", String::default()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
