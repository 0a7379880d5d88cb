//! Error Types
//!
//! `ErrorKind` is what a screen shows; `ClientError` is what the resource
//! client returns. The list controller never lets a `ClientError` escape, it
//! only records the matching `ErrorKind`.

use serde::Serialize;

/// User-visible failure categories, one per kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    LoadFailed,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
}

impl ErrorKind {
    /// Inline message shown next to the stale content
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::LoadFailed => "An error occurred loading todos.",
            ErrorKind::CreateFailed => "An error occurred adding the todo.",
            ErrorKind::UpdateFailed => "An error occurred saving the todo.",
            ErrorKind::DeleteFailed => "An error occurred deleting the todo.",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Failures on the todo detail screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailError {
    Load,
    Complete,
    Uncomplete,
    Delete,
    Undelete,
    Defer,
}

impl DetailError {
    pub fn message(&self) -> &'static str {
        match self {
            DetailError::Load => "An error occurred loading the todo.",
            DetailError::Complete => "An error occurred marking the todo complete.",
            DetailError::Uncomplete => "An error occurred marking the todo incomplete.",
            DetailError::Delete => "An error occurred deleting the todo.",
            DetailError::Undelete => "An error occurred undeleting the todo.",
            DetailError::Defer => "An error occurred deferring the todo.",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DetailError::Load => ErrorKind::LoadFailed,
            DetailError::Delete => ErrorKind::DeleteFailed,
            DetailError::Complete | DetailError::Uncomplete | DetailError::Undelete | DetailError::Defer => {
                ErrorKind::UpdateFailed
            }
        }
    }
}

impl std::fmt::Display for DetailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Failures on the category screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryError {
    Load,
    Save,
    Delete,
}

impl CategoryError {
    pub fn message(&self) -> &'static str {
        match self {
            CategoryError::Load => "An error occurred loading categories.",
            CategoryError::Save => "An error occurred saving the category.",
            CategoryError::Delete => "An error occurred deleting the category.",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CategoryError::Load => ErrorKind::LoadFailed,
            CategoryError::Save => ErrorKind::UpdateFailed,
            CategoryError::Delete => ErrorKind::DeleteFailed,
        }
    }
}

impl std::fmt::Display for CategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Resource client failures
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("expected a `{expected}` resource, got `{actual}`")]
    UnexpectedType {
        expected: &'static str,
        actual: String,
    },

    #[error("{0} is not supported here")]
    Unsupported(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
