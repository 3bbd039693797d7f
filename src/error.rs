//! Error handler for userbase.

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::Error as SQLxError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::crypto::CryptoError;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("a user with this email already exists")]
    EmailTaken,

    #[error("no user found")]
    UserNotFound,

    #[error("request body could not be read: {0}")]
    UnreadableBody(JsonRejection),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl ServerError {
    /// HTTP status sent back for this error.
    ///
    /// Caller mistakes are reported as `400 Bad Request`, everything else
    /// is a `500 Internal Server Error`.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_)
            | ServerError::Axum(_)
            | ServerError::EmailTaken
            | ServerError::UserNotFound => StatusCode::BAD_REQUEST,
            ServerError::UnreadableBody(_)
            | ServerError::MissingField(_)
            | ServerError::Sql(_)
            | ServerError::Crypto(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    r#type: Option<String>,
    title: String,
    status: u16,
    detail: String,
    instance: Option<String>,
    errors: Option<Vec<FieldError>>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(self) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            r#type: None,
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            instance: None,
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| issue.code.to_string()),
            })
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "server returned 500 status");

            return ResponseError::default()
                .into_response()
                .unwrap_or_else(|_| internal_server_error());
        }

        let response = ResponseError::default()
            .title("There were validation errors with your request.")
            .details(&self.to_string())
            .status(status);

        let response = match &self {
            ServerError::Validation(validation_errors) => response.errors(validation_errors),

            ServerError::Axum(rejection) => response
                .title("Request body could not be read.")
                .details(&rejection.body_text()),

            ServerError::EmailTaken => response.title("Email already in use."),

            ServerError::UserNotFound => response.title("User not found."),

            _ => response,
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({
                "type": null,
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "instance": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_faults_are_bad_requests() {
        assert_eq!(ServerError::EmailTaken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::UserNotFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::Validation(ValidationErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_faults_are_internal_errors() {
        assert_eq!(
            ServerError::MissingField("email").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::Sql(SQLxError::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let response = ServerError::MissingField("email").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
