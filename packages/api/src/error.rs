//! Errors returned by the backend client.

use serde::Deserialize;

/// Every failure a backend call can produce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Http(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("could not encode request: {0}")]
    Encode(String),
    #[error("not found")]
    NotFound,
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("realtime error: {0}")]
    Realtime(String),
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

pub type Result<T, E = BackendError> = std::result::Result<T, E>;

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Http(e.to_string())
        }
    }
}

impl From<serde_urlencoded::ser::Error> for BackendError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        BackendError::Encode(e.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode(e.to_string())
    }
}

/// The shapes of JSON error bodies the backend's services answer with.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Build an error from a non-success HTTP status and its raw body.
pub(crate) fn from_status(status: u16, body: &str) -> BackendError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("request failed with status {status}")
            } else {
                trimmed.to_string()
            }
        });

    match status {
        401 | 403 => BackendError::Unauthorized(message),
        // 406 is what the table API answers when a single row was requested and none matched
        404 | 406 => BackendError::NotFound,
        _ => BackendError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_is_preferred() {
        let err = from_status(400, r#"{"message":"duplicate key","code":"23505"}"#);
        assert_eq!(
            err,
            BackendError::Api {
                status: 400,
                message: "duplicate key".to_string()
            }
        );
    }

    #[test]
    fn test_auth_error_description() {
        let err = from_status(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn test_unauthorized_and_not_found() {
        assert!(matches!(
            from_status(401, r#"{"msg":"JWT expired"}"#),
            BackendError::Unauthorized(m) if m == "JWT expired"
        ));
        assert_eq!(from_status(406, "{}"), BackendError::NotFound);
    }

    #[test]
    fn test_plain_text_and_empty_bodies() {
        assert_eq!(from_status(502, "Bad Gateway").to_string(), "Bad Gateway");
        assert_eq!(
            from_status(500, "").to_string(),
            "request failed with status 500"
        );
    }
}
