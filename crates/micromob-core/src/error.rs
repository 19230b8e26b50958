use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("{operator} is partially configured: {missing} is missing")]
    IncompleteOperator {
        operator: &'static str,
        missing: String,
    },
}

/// An operator name outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operator: {0}")]
pub struct UnknownOperator(pub String);
