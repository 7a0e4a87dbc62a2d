use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};

use crate::bot::CrudError;

/* Errors of the HTTP control panel.
 * License and lifecycle failures render as the JSON body the dashboard reads,
 * with the message shown to the operator as is.
 */

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Could not initialize server: {0}")]
    InitializeError(String),
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LicenseError {
    #[error("License invalid")]
    Invalid,
    #[error("License inactive")]
    Inactive,
    #[error("HWID mismatch | your HWID: {0}")]
    HwidMismatch(String),
    #[error("Connection error: {0}")]
    Connection(String),
}

// Implement the From trait to convert from CrudError to LicenseError
impl From<CrudError> for LicenseError {
    fn from(crud_error: CrudError) -> LicenseError {
        LicenseError::Connection(crud_error.to_string())
    }
}

impl ResponseError for LicenseError {
    fn status_code(&self) -> StatusCode {
        match self {
            LicenseError::Invalid | LicenseError::Inactive | LicenseError::HwidMismatch(_) => {
                StatusCode::BAD_REQUEST
            }
            LicenseError::Connection(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "valid": false, "message": self.to_string() });
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body.to_string())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("Bot is already running.")]
    AlreadyRunning,
    #[error("No bot is running.")]
    NotRunning,
    #[error("Invalid bot settings: {0}")]
    InvalidSettings(String),
    #[error("Error starting bot: {0}")]
    StartFailed(String),
}

impl ResponseError for LifecycleError {
    fn status_code(&self) -> StatusCode {
        match self {
            LifecycleError::StartFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "success": false, "message": self.to_string() });
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body.to_string())
    }
}
