use crate::models::ErrorResponse;
use crate::services::pdf::ExtractError;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid upload: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("no file in request; send it as the multipart field \"file\"")]
    MissingFile,

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("processing failed")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Multipart(e) => e.status(),
            ApiError::MissingFile | ApiError::Extraction(ExtractError::Encoding) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
