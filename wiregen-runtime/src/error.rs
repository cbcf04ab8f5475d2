use thiserror::Error;

/// Errors surfaced by generated clients, dispatch functions, and transports.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to encode {type_name}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {type_name}")]
    Decode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown method '{method}' on service '{service}'")]
    UnknownMethod { service: String, method: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("{message}")]
    Handler { message: String },
}

impl ServiceError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        ServiceError::Transport {
            message: message.into(),
        }
    }

    /// Create a handler-side application error.
    pub fn handler(message: impl Into<String>) -> Self {
        ServiceError::Handler {
            message: message.into(),
        }
    }
}
