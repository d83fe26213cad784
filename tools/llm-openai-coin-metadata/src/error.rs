use {
    async_openai::error::OpenAIError,
    blogcoin_toolkit::StatusCode,
    schemars::JsonSchema,
    serde::Serialize,
    thiserror::Error,
};

/// Errors that can occur while generating coin metadata.
#[derive(Error, Debug)]
pub(crate) enum MetadataError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("OpenAI error: {0}")]
    OpenAi(#[from] OpenAIError),
    #[error("OpenAI returned no image")]
    NoImage,
    #[error("OpenAI returned the image inline instead of a URL")]
    UnexpectedImageFormat,
}

impl MetadataError {
    pub(crate) fn kind(&self) -> MetadataErrorKind {
        match self {
            MetadataError::Validation(_) => MetadataErrorKind::Validation,
            MetadataError::OpenAi(_)
            | MetadataError::NoImage
            | MetadataError::UnexpectedImageFormat => MetadataErrorKind::Upstream,
        }
    }
}

/// Types of errors reported by the metadata tools.
#[derive(Serialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MetadataErrorKind {
    /// The input is missing something.
    Validation,
    /// OpenAI could not be reached or answered with an error.
    Upstream,
}

impl MetadataErrorKind {
    pub(crate) fn status(self) -> StatusCode {
        match self {
            MetadataErrorKind::Validation => StatusCode::BAD_REQUEST,
            MetadataErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        }
    }
}
