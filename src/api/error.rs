use thiserror::Error;

/// Failures surfaced by the transport client.
///
/// `Unauthorized` is the distinguished 401 class: the transport clears the
/// session before returning it, so callers never handle re-auth themselves.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("unauthorized")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e)
        } else {
            ApiError::Network(e)
        }
    }
}

impl ApiError {
    /// Whether this is the 401 class that forces a re-login
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        assert_eq!(ApiError::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn test_http_message() {
        let err = ApiError::Http {
            status: 503,
            message: "service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: service unavailable");
    }
}
