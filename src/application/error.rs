use thiserror::Error;

use crate::{
    domain::{content::ContentKind, decode::DecodeError},
    infra::{error::InfraError, github::GatewayError},
};

/// Why a single fetch failed, before it is tagged with the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Invalid metadata.json format")]
    Shape,
    #[error("invalid JSON payload: {0}")]
    Json(String),
}

impl From<serde_json::Error> for FetchFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Failure of a content repository operation.
///
/// Cloneable so every caller sharing a coalesced request sees the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Error fetching {kind} list: {source}")]
    ListFetch {
        kind: ContentKind,
        source: FetchFailure,
    },
    #[error("Error fetching content for {file_name}: {source}")]
    ContentFetch {
        file_name: String,
        source: FetchFailure,
    },
}

impl ContentError {
    pub fn failure(&self) -> &FetchFailure {
        match self {
            ContentError::ListFetch { source, .. } | ContentError::ContentFetch { source, .. } => {
                source
            }
        }
    }
}

/// Top-level error for the command-line binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
