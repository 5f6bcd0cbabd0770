use async_graphql::ErrorExtensions;

use crate::pagination::PageError;
use crate::pipeline::PipelineError;
use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Unexpected error")]
    Internal,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFilter(_) | Self::InvalidPagination(_) => "BAD_REQUEST",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        tracing::error!(error = %err, "upstream request failed");
        Self::Internal
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self::InvalidFilter(err.to_string())
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        Self::InvalidPagination(err.to_string())
    }
}
