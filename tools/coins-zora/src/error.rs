use {
    blogcoin_toolkit::StatusCode,
    blogcoin_types::{InvalidValue, MintFailure},
    schemars::JsonSchema,
    serde::Serialize,
    thiserror::Error,
};

/// Errors that can occur while talking to the coin factory.
#[derive(Error, Debug)]
pub(crate) enum FactoryError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    /// The factory answered with a non-2xx status. `message` is the `error`
    /// field of the body when there is one.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Invalid coin factory URL '{0}'")]
    InvalidUrl(String),
}

impl FactoryError {
    pub(crate) fn status_code(&self) -> Option<u16> {
        match self {
            FactoryError::Api { status, .. } => Some(*status),
            FactoryError::Network(_) | FactoryError::InvalidUrl(_) => None,
        }
    }
}

/// Errors reported by the coins tools.
#[derive(Error, Debug)]
pub(crate) enum CoinsError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    InvalidValue(#[from] InvalidValue),
    #[error("{failure}")]
    Mint {
        failure: MintFailure,
        status_code: Option<u16>,
    },
    #[error("Coin factory error: {0}")]
    Factory(#[from] FactoryError),
}

impl CoinsError {
    pub(crate) fn kind(&self) -> CoinsErrorKind {
        match self {
            CoinsError::Validation(_) | CoinsError::InvalidValue(_) => CoinsErrorKind::Validation,
            CoinsError::Mint { .. } => CoinsErrorKind::Mint,
            CoinsError::Factory(_) => CoinsErrorKind::Upstream,
        }
    }

    pub(crate) fn status_code(&self) -> Option<u16> {
        match self {
            CoinsError::Mint { status_code, .. } => *status_code,
            CoinsError::Factory(e) => e.status_code(),
            _ => None,
        }
    }

    pub(crate) fn into_failure(self) -> Option<MintFailure> {
        match self {
            CoinsError::Mint { failure, .. } => Some(failure),
            _ => None,
        }
    }
}

impl From<FactoryError> for MintFailure {
    fn from(e: FactoryError) -> Self {
        MintFailure::classify(e.to_string())
    }
}

/// Types of errors reported by the coins tools.
#[derive(Serialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CoinsErrorKind {
    /// The input is missing something or is malformed.
    Validation,
    /// The coin could not be minted, see the attached failure.
    Mint,
    /// The coin factory could not be reached or answered with an error.
    Upstream,
}

impl CoinsErrorKind {
    pub(crate) fn status(self) -> StatusCode {
        match self {
            CoinsErrorKind::Validation => StatusCode::BAD_REQUEST,
            CoinsErrorKind::Mint | CoinsErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        }
    }
}
