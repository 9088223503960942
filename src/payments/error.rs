use thiserror::Error;

pub type SaferpayResult<T> = Result<T, SaferpayError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaferpayError {
    #[error("Saferpay: no http transport configured")]
    TransportNotConfigured,

    #[error("Saferpay: request failed with statuscode: {status_code}!")]
    Transport { status_code: u16 },

    #[error("Saferpay: request failed: {body}!")]
    Provider { body: String },

    #[error("Saferpay: Invalid xml received from saferpay: {message}")]
    InvalidResponseFormat { message: String },

    #[error("Saferpay: call confirm before complete!")]
    ConfirmRequired,

    #[error("Saferpay: action {action} requires a password")]
    CredentialRequired { action: String },

    #[error("Saferpay: network error: {message}")]
    Network { message: String },

    #[error("Saferpay: cannot {operation} a transaction in state {state}")]
    InvalidState {
        state: String,
        operation: &'static str,
    },

    #[error("Saferpay: configuration error: {message}")]
    Config { message: String },
}

impl SaferpayError {
    pub fn invalid_response_format(message: impl Into<String>) -> Self {
        Self::InvalidResponseFormat {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the provider answered but rejected the request.
    pub fn is_provider_rejection(&self) -> bool {
        matches!(
            self,
            SaferpayError::Transport { .. } | SaferpayError::Provider { .. }
        )
    }

    /// True when the call was refused locally, before anything went on the wire.
    pub fn is_precondition(&self) -> bool {
        match self {
            SaferpayError::TransportNotConfigured => true,
            SaferpayError::ConfirmRequired => true,
            SaferpayError::CredentialRequired { .. } => true,
            SaferpayError::InvalidState { .. } => true,
            SaferpayError::Transport { .. } => false,
            SaferpayError::Provider { .. } => false,
            SaferpayError::InvalidResponseFormat { .. } => false,
            SaferpayError::Network { .. } => false,
            SaferpayError::Config { .. } => false,
        }
    }
}

impl From<crate::config::ConfigError> for SaferpayError {
    fn from(err: crate::config::ConfigError) -> Self {
        SaferpayError::config(err.to_string())
    }
}
