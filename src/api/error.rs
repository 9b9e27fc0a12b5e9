use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - credential may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Whether the failure means the resource does not exist (as opposed to
    /// a transient transport or server problem)
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_taxonomy() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "no such file"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::NOT_FOUND, &body);
        let msg = err.to_string();
        assert!(msg.len() < 700);
        assert!(msg.contains("truncated"));
    }
}
