//! Domain failure taxonomy.
//!
//! Every use-case returns `Result<T, Error>` where the error carries exactly one
//! [`ErrorCode`]. The codes are transport agnostic; inbound adapters map the
//! numeric [`ErrorCode::classification`] onto their own status vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use super::TraceId;

/// Closed set of failure kinds raised by the lifecycle engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A mandatory field is missing or blank.
    ArgumentRequired,
    /// Identity is missing or invalid where one is required.
    Unauthorized,
    /// A value is present but does not match what the operation accepts.
    IncorrectData,
    /// The actor is authenticated but lacks rights over the resource.
    Forbidden,
    /// A referenced entity does not resolve.
    DataNotFound,
    /// A uniqueness invariant would be violated.
    DataAlreadyExist,
    /// The persistence layer reported a failure.
    StorageFailure,
}

impl ErrorCode {
    /// Stable numeric classification used by boundary layers.
    ///
    /// # Examples
    /// ```
    /// use mission_board::domain::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::DataAlreadyExist.classification(), 409);
    /// ```
    pub const fn classification(self) -> u16 {
        match self {
            Self::ArgumentRequired => 400,
            Self::Unauthorized => 401,
            Self::IncorrectData => 422,
            Self::Forbidden => 403,
            Self::DataNotFound => 404,
            Self::DataAlreadyExist => 409,
            Self::StorageFailure => 500,
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::ArgumentRequired => "required argument missing",
            Self::Unauthorized => "authentication required",
            Self::IncorrectData => "incorrect data",
            Self::Forbidden => "access denied",
            Self::DataNotFound => "data not found",
            Self::DataAlreadyExist => "data already exists",
            Self::StorageFailure => "storage failure",
        }
    }
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank once trimmed.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id`, when present, is non-empty.
///
/// # Examples
/// ```
/// use mission_board::domain::{Error, ErrorCode};
///
/// let err = Error::forbidden("not your mission");
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// assert_eq!(err.message(), "not your mission");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    ///
    /// A blank message is replaced with the code's generic wording.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Fallible constructor that rejects blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(code, message))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured at construction time, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier, replacing any captured one.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Fallible variant of [`Error::with_trace_id`].
    pub fn try_with_trace_id(
        self,
        trace_id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let trace_id = trace_id.into();
        if trace_id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(self.with_trace_id(trace_id))
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use mission_board::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::argument_required("title is required")
    ///     .with_details(json!({ "field": "title" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// [`ErrorCode::ArgumentRequired`] naming the missing field in `details`.
    pub fn missing_field(field: &str) -> Self {
        Self::argument_required(format!("{field} is required"))
            .with_details(json!({ "field": field }))
    }

    /// Convenience constructor for [`ErrorCode::ArgumentRequired`].
    pub fn argument_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ArgumentRequired, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::IncorrectData`].
    pub fn incorrect_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IncorrectData, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::DataNotFound`].
    pub fn data_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::DataAlreadyExist`].
    pub fn data_already_exist(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataAlreadyExist, message)
    }

    /// Convenience constructor for [`ErrorCode::StorageFailure`].
    ///
    /// Callers pass a generic message; storage details belong in logs.
    pub fn storage_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageFailure, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            trace_id,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        // Deserialised payloads keep their own trace id, not the ambient one.
        error.trace_id = None;
        if let Some(id) = trace_id {
            error = error.try_with_trace_id(id)?;
        }
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
mod tests;
