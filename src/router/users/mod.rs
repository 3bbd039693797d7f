//! Users-related HTTP API.
mod create;
mod delete;
mod get;
mod update;

use axum::Router;
use axum::routing::{get, post};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // `POST /api` goes to `create`.
        .route("/api", post(create::handler))
        // `GET`, `PUT` and `DELETE /api/:ID`.
        .route(
            "/api/{user_id}",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
}
