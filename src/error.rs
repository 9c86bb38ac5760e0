use thiserror::Error;

/// Crate-wide error type.
///
/// Most user-facing flows degrade these into empty lists or toast messages;
/// the variants exist so the degradation happens in one place with the real
/// cause logged.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status from an upstream service.
    #[error("Upstream returned HTTP {status}")]
    Http { status: u16 },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The GraphQL backend answered with an `errors` array.
    #[error("{}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    /// A GraphQL response carried neither data nor errors.
    #[error("GraphQL response had no data for `{operation}`")]
    MissingData { operation: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client-side validation failed before anything was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Session persistence or socket setup failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl Error {
    /// Message suitable for a blocking toast.
    pub fn toast_message(&self) -> String {
        match self {
            Self::GraphQl { messages } if !messages.is_empty() => messages.join("\n"),
            Self::Validation(message) => message.clone(),
            Self::Transport(_) | Self::Http { .. } => {
                "Could not reach the server. Please try again.".to_string()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
