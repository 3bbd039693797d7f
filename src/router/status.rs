//! Public status page for front-end identification.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::config::Configuration;

/// Structured configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    version: String,
    name: String,
    url: Option<String>,
}

/// Public server status (configuration).
pub async fn status(State(config): State<Arc<Configuration>>) -> Json<Status> {
    Json(Status {
        version: env!("CARGO_PKG_VERSION").into(),
        name: config.name.clone(),
        url: config.url.clone(),
    })
}
