// Client error types
use thiserror::Error;

pub const CONNECTION_ERROR_MESSAGE: &str = "Error de conexión";

/// Every failure a remote call or a local check can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No usable response: refused connection, DNS failure, unreadable body.
    #[error("{0}")]
    Connection(String),

    #[error("La solicitud excedió el tiempo de espera")]
    Timeout,

    /// The remote API answered 401. The session has already been reset.
    /// Carries the `error`/`message` text of the 401 body, when there was one.
    #[error("Sesión expirada, inicia sesión nuevamente")]
    Unauthorized(Option<String>),

    /// Any other unsuccessful response, carrying the remote message verbatim.
    #[error("{0}")]
    Remote(String),

    /// Rejected before reaching the network.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Respuesta inválida del servidor: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn connection(message: impl Into<String>) -> Self {
        ClientError::Connection(message.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        ClientError::Remote(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Connection(_) => "CONNECTION_ERROR",
            ClientError::Timeout => "TIMEOUT",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Remote(_) => "REMOTE_ERROR",
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Field the error refers to, for local validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ClientError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ClientError::Timeout;
        }
        if err.is_decode() {
            return ClientError::Decode(err.to_string());
        }
        tracing::debug!("transport error: {}", err);
        ClientError::Connection(CONNECTION_ERROR_MESSAGE.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Connection(format!("URL de solicitud inválida: {}", err))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
