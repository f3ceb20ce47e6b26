use thiserror::Error;

use crate::event::ApiResponse;

/// Error type shared by the store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Everything a handler can fail with. The message doubles as the
/// `{"error": ...}` body sent to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid action")]
    InvalidAction,
    #[error("Username and password required")]
    MissingCredentials,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Admin already exists")]
    AdminExists,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Product ID required")]
    MissingProductId,
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAction
            | Self::MissingCredentials
            | Self::AdminExists
            | Self::MissingProductId => 400,
            Self::InvalidCredentials | Self::Unauthorized => 401,
            Self::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status_code();
        if status >= 500 {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status, "request rejected");
        }
        ApiResponse::error(status, &self.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(format!("{e:#}"))
    }
}

pub type AppResult<T> = Result<T, AppError>;
