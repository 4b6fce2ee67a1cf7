use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use cine_types::ValidationErrors;
use http::StatusCode;
use serde_json::json;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] JsonRejection),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Edit conflict: {0}")]
    EditConflict(String),

    #[error("Database error: {0}")]
    DatabaseError(cine_dal::Error),
}

impl From<cine_dal::Error> for ApiError {
    fn from(err: cine_dal::Error) -> Self {
        match err {
            cine_dal::Error::RecordNotFound(what) => ApiError::ResourceNotFound(what),
            e @ cine_dal::Error::EditConflict { .. } => ApiError::EditConflict(e.to_string()),
            e => ApiError::DatabaseError(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EditConflict(_) => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({ "error": errors }),
            ApiError::InvalidPayload(rejection) => json!({ "error": rejection.body_text() }),
            ApiError::ResourceNotFound(_) => {
                json!({ "error": "the requested resource could not be found" })
            }
            ApiError::EditConflict(_) => json!({
                "error": "unable to update the record due to an edit conflict, please try again"
            }),
            e @ ApiError::DatabaseError(_) => {
                error!("Request failed: {e}");
                json!({
                    "error": "the server encountered a problem and could not process your request"
                })
            }
        };
        (status, Json(body)).into_response()
    }
}
