use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::WizardError;
use crate::services::receipt::ReceiptError;
use crate::store::StoreError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not save the bill: {0}")]
    Storage(#[from] StoreError),

    #[error("Could not create the receipt: {0}")]
    Document(#[from] ReceiptError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Wrong wizard step: {0}")]
    WrongStep(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match &err {
            WizardError::Validation(e) => e.clone().into(),
            WizardError::WrongStep { .. } => AppError::WrongStep(err.to_string()),
            WizardError::NoSuchItem { .. } => AppError::NotFound(err.to_string()),
        }
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Storage(_) | AppError::Document(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::WrongStep(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
