//! # error
//!
//! Centralised library error type.
//!
//! The feed generator and the renderer have no error states of their own;
//! failures only come from the edges: a missing surface at mount time,
//! malformed configuration, snapshot I/O, and the rate lookup (which callers
//! normally absorb into a fallback).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// `mount` was called without a drawable surface. Nothing was started.
    #[error("Drawing surface unavailable")]
    SurfaceUnavailable,

    /// An environment variable held a value that could not be used.
    #[error("Invalid config {key}: {message}")]
    Config { key: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rate endpoint failed or answered with an unusable body.
    #[error("Rate lookup failed: {0}")]
    Rate(String),
}

impl ChartError {
    pub fn config(key: &'static str, message: impl Into<String>) -> Self {
        ChartError::Config { key, message: message.into() }
    }
}

impl From<reqwest::Error> for ChartError {
    fn from(err: reqwest::Error) -> Self {
        ChartError::Rate(err.to_string())
    }
}
