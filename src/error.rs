//! Typed failures shared by the HTTP services and the controllers.

/// Every way a backend call or a controller operation can fail.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No response was received (connection refused, DNS, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {body}")]
    Server {
        status: u16,
        /// Raw response body, trimmed, for the log.
        body: String,
    },

    /// The response body did not have the expected array/object shape.
    #[error("unexpected response shape: {0}")]
    Shape(String),

    /// The operation was refused before any request went out.
    #[error("{0}")]
    Precondition(String),
}

impl ServiceError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Short tag used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::Shape(_) => "shape",
            Self::Precondition(_) => "precondition",
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Shape(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_shape_failures() {
        let err: ServiceError = serde_json::from_str::<Vec<i64>>("{}").unwrap_err().into();
        assert_eq!(err.kind(), "shape");
    }

    #[test]
    fn server_error_message_names_status() {
        let err = ServiceError::Server {
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(err.to_string(), "backend returned 404: not found");
        assert_eq!(err.kind(), "server");
    }
}
