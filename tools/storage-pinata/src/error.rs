use {
    blogcoin_toolkit::StatusCode,
    blogcoin_types::InvalidValue,
    schemars::JsonSchema,
    serde::Serialize,
    thiserror::Error,
};

/// Errors that can occur while talking to Pinata or fetching images.
#[derive(Error, Debug)]
pub(crate) enum PinataError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Pinata API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Failed to encode pin metadata: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to fetch image ({status}): {url}")]
    ImageFetch { status: u16, url: String },
    #[error("Image at {url} is larger than {limit} bytes")]
    ImageTooLarge { url: String, limit: usize },
}

/// Errors reported by the pinning tools.
#[derive(Error, Debug)]
pub(crate) enum PinningError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    InvalidValue(#[from] InvalidValue),
    #[error("Failed to upload to IPFS: {0}")]
    Pinata(#[from] PinataError),
    #[error("{0}")]
    Internal(&'static str),
}

impl PinningError {
    pub(crate) fn kind(&self) -> PinningErrorKind {
        match self {
            PinningError::Validation(_) | PinningError::InvalidValue(_) => {
                PinningErrorKind::Validation
            }
            PinningError::Pinata(_) => PinningErrorKind::Upstream,
            PinningError::Internal(_) => PinningErrorKind::Internal,
        }
    }

    /// Status code Pinata answered with, if it answered.
    pub(crate) fn status_code(&self) -> Option<u16> {
        match self {
            PinningError::Pinata(PinataError::Api { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Types of errors reported by the pinning tools.
#[derive(Serialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PinningErrorKind {
    /// The input is missing something or is malformed.
    Validation,
    /// Pinata could not be reached or answered with an error.
    Upstream,
    /// Something that should not happen did.
    Internal,
}

impl PinningErrorKind {
    pub(crate) fn status(self) -> StatusCode {
        match self {
            PinningErrorKind::Validation => StatusCode::BAD_REQUEST,
            PinningErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            PinningErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
