use micromob_core::Operator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unauthorized response from {url}")]
    Unauthorized { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to refresh {operator} token: {source}")]
    TokenRefresh {
        operator: Operator,
        #[source]
        source: Box<OperatorError>,
    },
}

impl OperatorError {
    /// HTTP status associated with the failure, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            OperatorError::Http(e) => e.status().map(|s| s.as_u16()),
            OperatorError::Unauthorized { .. } => Some(401),
            OperatorError::UnexpectedStatus { status, .. } => Some(*status),
            OperatorError::TokenRefresh { source, .. } => source.status(),
            OperatorError::Deserialize { .. } => None,
        }
    }
}
