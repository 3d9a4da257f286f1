//! Error types for the Cloud Foundry API client.
//!
//! Every failure produced by this crate resolves to exactly one [`Error`],
//! whose [`ErrorKind`] is stable across releases. Non-2xx responses are
//! converted by [`translate`], which understands the structured error
//! bodies returned by the v2 and v3 cloud controller APIs and by UAA.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Cloud Foundry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request value or client configuration was malformed. Raised
    /// before any network call.
    Validation,
    /// Connection failure, timeout, unreadable body, or a non-2xx response
    /// without a structured error body.
    Transport,
    /// A non-2xx response carrying a structured application error.
    Protocol,
    /// A body could not be encoded, or a response body did not match the
    /// expected schema.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Transport => "transport",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// The error type for all Cloud Foundry API operations.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The request was rejected locally before being sent.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The exchange failed below the application layer.
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Human-readable description
        message: String,
    },

    /// The server answered with a structured error.
    #[error("API error: status={status}, code={code:?}, error={error_name:?}, description={description}")]
    Protocol {
        /// HTTP status code
        status: u16,
        /// Numeric error code (v2 `code`, v3 `errors[].code`)
        code: Option<i64>,
        /// Symbolic error name (`CF-AppNotFound`, `invalid_token`, ...)
        error_name: Option<String>,
        /// Human-readable error description
        description: String,
        /// Raw response body for diagnostics
        body: String,
    },

    /// A body did not match the expected schema.
    #[error("Decode error: {message}")]
    Decode {
        /// Human-readable description
        message: String,
        /// Raw response body, when one was read
        body: Option<String>,
    },
}

impl Error {
    /// The stable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Protocol { .. } => ErrorKind::Protocol,
            Error::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// The HTTP status associated with this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => *status,
            Error::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially transient and an
    /// idempotent operation could be retried by the caller.
    ///
    /// This crate never retries on its own.
    ///
    /// # Example
    ///
    /// ```
    /// use cloudfoundry_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable() {
    ///         println!("Retrying operation...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { status, .. } => status.map_or(true, |s| s >= 500 || s == 429),
            Error::Protocol { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Validation(_) => true,
            _ => matches!(self.status(), Some(s) if (400..500).contains(&s)),
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if s >= 500)
    }

    /// Returns `true` if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Error::Decode {
                message: err.to_string(),
                body: None,
            };
        }
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        Error::Transport {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode {
            message: err.to_string(),
            body: None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Validation(format!("invalid URL: {err}"))
    }
}

/// Convert a failed exchange into an [`Error`].
///
/// Structured bodies in any of the v2, v3 or UAA error schemas produce
/// [`Error::Protocol`]. Anything else, including an empty body, produces
/// [`Error::Transport`] described by the status line. This function never
/// fails.
pub fn translate(status: u16, body: &[u8]) -> Error {
    let raw = String::from_utf8_lossy(body).into_owned();

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => match structured_error(&value) {
            Some((code, error_name, description)) => Error::Protocol {
                status,
                code,
                error_name,
                description,
                body: raw,
            },
            None => status_only(status),
        },
        Err(_) => status_only(status),
    }
}

fn status_only(status: u16) -> Error {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");
    Error::Transport {
        status: Some(status),
        message: format!("{status} {reason}"),
    }
}

type Structured = (Option<i64>, Option<String>, String);

fn structured_error(value: &Value) -> Option<Structured> {
    let object = value.as_object()?;

    // v3: {"errors": [{"code": .., "title": .., "detail": ..}]}
    if let Some(errors) = object.get("errors").and_then(Value::as_array) {
        let first = errors.first()?;
        let details: Vec<&str> = errors
            .iter()
            .filter_map(|e| e.get("detail").and_then(Value::as_str))
            .collect();
        let description = if details.is_empty() {
            str_field(first, "title")?
        } else {
            details.join("; ")
        };
        return Some((
            first.get("code").and_then(Value::as_i64),
            first.get("title").and_then(Value::as_str).map(String::from),
            description,
        ));
    }

    // v2: {"code": .., "description": .., "error_code": ..}
    if let Some(description) = object.get("description").and_then(Value::as_str) {
        return Some((
            object.get("code").and_then(Value::as_i64),
            object.get("error_code").and_then(Value::as_str).map(String::from),
            description.to_string(),
        ));
    }

    // UAA: {"error": .., "error_description": ..}
    if let Some(error) = object.get("error").and_then(Value::as_str) {
        let description = str_field(value, "error_description").unwrap_or_else(|| error.to_string());
        return Some((None, Some(error.to_string()), description));
    }

    None
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}
