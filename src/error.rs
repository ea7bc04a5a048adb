//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::not_found::get_404_not_found_response;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The session token could not be decrypted, parsed, or has expired.
    #[error("invalid or expired session token")]
    InvalidCredentials,

    /// The session token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error creating or formatting the session expiry date time.
    #[error("could not format session expiry date-time: {0}")]
    InvalidDateFormat(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A read or write against the transaction store failed.
    ///
    /// The string holds the underlying SQL error and should only be logged or
    /// echoed back as the `error` field of a generic server error.
    #[error("the transaction store is unavailable: {0}")]
    StoreUnavailable(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The spreadsheet writer could not serialize the export rows.
    #[error("could not generate spreadsheet: {0}")]
    FormatError(String),

    /// A transaction was submitted with an empty source or category.
    ///
    /// The string is the name of the offending field.
    #[error("{0} cannot be empty")]
    EmptyLabel(&'static str),

    /// A transaction was submitted with a negative, NaN or infinite amount.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    InvalidAmount(f64),

    /// A sum of amounts overflowed to infinity or NaN.
    ///
    /// The string is the name of the offending total.
    #[error("the {0} total is too large to represent")]
    NonFiniteTotal(&'static str),

    /// A response body could not be serialized to JSON.
    #[error("could not serialize response body: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::StoreUnavailable(error.to_string())
            }
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        tracing::error!("could not write spreadsheet: {}", value);
        Error::FormatError(value.to_string())
    }
}

/// The message sent to clients for errors they cannot fix themselves.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// The message sent to clients when a spreadsheet export fails.
pub const EXPORT_ERROR_MESSAGE: &str = "Error generating Excel file";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidCredentials | Error::CookieMissing => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Not authorized, no valid session" })),
            )
                .into_response(),
            Error::EmptyLabel(_) | Error::InvalidAmount(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": self.to_string() })),
            )
                .into_response(),
            Error::FormatError(ref error) => {
                tracing::error!("Error generating Excel: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": EXPORT_ERROR_MESSAGE })),
                )
                    .into_response()
            }
            // Any errors that are not handled above are not intended to be fixed by the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": SERVER_ERROR_MESSAGE,
                        "error": error.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}
