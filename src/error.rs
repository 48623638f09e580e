//! Unified error types for the prediction service.

use thiserror::Error;

/// Unified error type for the prediction service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Classifier loading or inference error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Prediction client error.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}

/// Classifier loading and inference errors.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The model artifact could not be loaded from disk.
    #[error("failed to load model from {path}: {reason}")]
    LoadFailed {
        /// Path to the model artifact.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// The classifier call itself failed.
    #[error("inference failed: {0}")]
    InferenceFailed(String),

    /// The model produced an output we cannot interpret.
    #[error("unexpected model output: {0}")]
    UnexpectedOutput(String),
}

/// Errors surfaced by the prediction client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP request could not be sent or completed.
    #[error("request to {url} failed: {reason}")]
    RequestFailed {
        /// Target URL.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body (the service's `erreur` payload).
        body: String,
    },

    /// The response body could not be decoded as a prediction result.
    #[error("invalid response payload: {0}")]
    InvalidResponse(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
