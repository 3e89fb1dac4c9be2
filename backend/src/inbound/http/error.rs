//! HTTP mapping for domain errors.
//!
//! The domain error stays transport agnostic; this module turns its numeric
//! classification into a status code and renders the JSON envelope
//! `{status, code, message, traceId?, details?}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};
use crate::middleware::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_STORAGE_MESSAGE: &str = "storage failure";

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// HTTP status, repeated in the body for clients that lose it.
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&Error> for ErrorBody {
    fn from(error: &Error) -> Self {
        // Storage details are logged where they happen, never returned.
        let (message, details) = if error.code() == ErrorCode::StorageFailure {
            (REDACTED_STORAGE_MESSAGE.to_owned(), None)
        } else {
            (error.message().to_owned(), error.details().cloned())
        };
        Self {
            status: error.code().classification(),
            code: error.code(),
            message,
            trace_id: error.trace_id().map(str::to_owned),
            details,
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    StatusCode::from_u16(code.classification()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorBody::from(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::storage_failure(REDACTED_STORAGE_MESSAGE)
    }
}
