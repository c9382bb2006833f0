//! Error type shared by all crates of the service.
//!
//! Every fallible operation returns `AppResult<T>`. The HTTP layer turns an
//! `Error` into a JSON error body through its `IntoResponse` implementation.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_with::skip_serializing_none;

pub type AppResult<T> = std::result::Result<T, Error>;

/// A rejected input value, reported to the client with a machine readable
/// code, an English message and a message in the user's locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
	pub code: &'static str,
	pub message: &'static str,
	pub localized_message: &'static str,
}

impl ValidationFailure {
	pub const fn new(
		code: &'static str,
		message: &'static str,
		localized_message: &'static str,
	) -> Self {
		Self { code, message, localized_message }
	}
}

#[derive(Debug)]
pub enum Error {
	/// No usable access token
	Unauthorized,
	/// Token is valid but the role does not allow the operation
	PermissionDenied,
	NotFound,
	/// Malformed request (bad path parameter, bad JSON)
	ValidationError(String),
	/// Well-formed request with an unacceptable value
	Unprocessable(ValidationFailure),
	/// The verification code did not match
	VerificationFailed,
	Parse,
	DbError,
	ConfigError(String),
	ServiceUnavailable(String),
	Internal(String),

	// externals
	Io(std::io::Error),
	Json(serde_json::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Json(err)
	}
}

impl From<ValidationFailure> for Error {
	fn from(failure: ValidationFailure) -> Self {
		Self::Unprocessable(failure)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::NotFound => write!(f, "not found"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::Unprocessable(failure) => write!(f, "{}: {}", failure.code, failure.message),
			Error::VerificationFailed => write!(f, "channel verification failed"),
			Error::Parse => write!(f, "parse error"),
			Error::DbError => write!(f, "database error"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
			Error::Json(err) => write!(f, "JSON error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			Error::Json(err) => Some(err),
			_ => None,
		}
	}
}

/// JSON body of every error response
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
	pub code: &'static str,
	pub message: String,
	pub localized_message: Option<&'static str>,
}

impl ErrorResponse {
	fn new(code: &'static str, message: impl Into<String>) -> Self {
		Self { code, message: message.into(), localized_message: None }
	}
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::ValidationError(_) | Error::Parse | Error::VerificationFailed => {
				StatusCode::BAD_REQUEST
			}
			Error::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
			Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::DbError
			| Error::ConfigError(_)
			| Error::Internal(_)
			| Error::Io(_)
			| Error::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn body(&self) -> ErrorResponse {
		match self {
			Error::Unauthorized => ErrorResponse::new("E-AUTH-UNAUTHORIZED", "Access token is missing or invalid"),
			Error::PermissionDenied => ErrorResponse::new("E-AUTH-FORBIDDEN", "Permission denied"),
			Error::NotFound => ErrorResponse::new("E-NOT-FOUND", "Not found"),
			Error::ValidationError(msg) => ErrorResponse::new("E-BAD-REQUEST", msg.clone()),
			Error::Parse => ErrorResponse::new("E-BAD-REQUEST", "Malformed request"),
			Error::Unprocessable(failure) => ErrorResponse {
				code: failure.code,
				message: failure.message.to_string(),
				localized_message: Some(failure.localized_message),
			},
			Error::VerificationFailed => {
				ErrorResponse::new("E-VERIFICATION-FAILED", "Channel verification failed")
			}
			Error::ServiceUnavailable(_) => {
				ErrorResponse::new("E-SERVICE-UNAVAILABLE", "Service temporarily unavailable")
			}
			Error::DbError
			| Error::ConfigError(_)
			| Error::Internal(_)
			| Error::Io(_)
			| Error::Json(_) => ErrorResponse::new("E-INTERNAL", "Internal server error"),
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!("request failed: {}", self);
		} else {
			tracing::debug!("request rejected: {}", self);
		}
		(status, Json(self.body())).into_response()
	}
}


// vim: ts=4
