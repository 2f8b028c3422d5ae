use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Configuration,
    pub(crate) catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(config: Configuration, catalog: Box<dyn CatalogService>) -> AppState {
        AppState {
            config,
            catalog: Arc::from(catalog),
        }
    }
}

// ServerError carries the status and either a `{"message": ...}` body or a plain text body
#[derive(Debug, PartialEq)]
pub struct ServerError {
    pub status: StatusCode,
    pub message: String,
    pub plain: bool,
}

impl ServerError {
    pub fn json(status: StatusCode, message: &str) -> Self {
        ServerError { status, message: message.to_string(), plain: false }
    }

    pub fn plain(status: StatusCode, message: &str) -> Self {
        ServerError { status, message: message.to_string(), plain: true }
    }
}

pub fn json_to_server_error<E: std::fmt::Display>(err: E) -> ServerError {
    ServerError::plain(StatusCode::BAD_REQUEST, format!("{}", err).as_str())
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.plain {
            (self.status, self.message).into_response()
        } else {
            (self.status, Json(json!({ "message": self.message }))).into_response()
        }
    }
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound { message } => {
                ServerError::json(StatusCode::NOT_FOUND, message.as_str())
            }
            CommandError::InvalidTransition { message } => {
                ServerError::json(StatusCode::BAD_REQUEST, message.as_str())
            }
            CommandError::Validation { message, .. } => {
                ServerError::plain(StatusCode::BAD_REQUEST, message.as_str())
            }
            CommandError::Serialization { message } => {
                ServerError::plain(StatusCode::BAD_REQUEST, message.as_str())
            }
            CommandError::Conflict { message, .. } => {
                ServerError::json(StatusCode::CONFLICT, message.as_str())
            }
            CommandError::Database { .. } => {
                ServerError::json(StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err).as_str())
            }
            CommandError::Runtime { .. } => {
                ServerError::json(StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err).as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use crate::core::command::CommandError;
    use crate::core::controller::ServerError;

    #[tokio::test]
    async fn test_should_map_command_errors() {
        let err = ServerError::from(CommandError::NotFound { message: "Book not found with isbn : 1".to_string() });
        assert_eq!(ServerError::json(StatusCode::NOT_FOUND, "Book not found with isbn : 1"), err);

        let err = ServerError::from(CommandError::InvalidTransition { message: "Book is not borrowed".to_string() });
        assert_eq!(ServerError::json(StatusCode::BAD_REQUEST, "Book is not borrowed"), err);

        let err = ServerError::from(CommandError::Validation { message: "Invalid book data".to_string(), reason_code: None });
        assert_eq!(ServerError::plain(StatusCode::BAD_REQUEST, "Invalid book data"), err);

        let err = ServerError::from(CommandError::Conflict { message: "changed".to_string(), reason_code: None });
        assert_eq!(StatusCode::CONFLICT, err.status);

        let err = ServerError::from(CommandError::Database { message: "down".to_string(), reason_code: None, retryable: true });
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, err.status);
    }
}
