// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for cardtrim.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all cardtrim operations.
#[derive(Debug, Error)]
pub enum CardtrimError {
    // -- Input errors --
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("unsupported image mode: {0}")]
    UnsupportedMode(String),

    // -- Processing errors --
    #[error("invalid pixel grid: {0}")]
    InvalidGrid(String),

    #[error("invalid crop bounds: {0}")]
    InvalidBounds(String),

    // -- Output errors --
    #[error("image encode failed: {0}")]
    Encode(String),

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CardtrimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_shows_path() {
        let err = CardtrimError::NotFound(PathBuf::from("images/cups_05.png"));
        assert_eq!(err.to_string(), "file not found: images/cups_05.png");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CardtrimError = io.into();
        assert!(matches!(err, CardtrimError::Io(_)));
        assert_eq!(err.to_string(), "file I/O error: denied");
    }

    #[test]
    fn invalid_bounds_message() {
        let err = CardtrimError::InvalidBounds("empty rectangle".into());
        assert_eq!(err.to_string(), "invalid crop bounds: empty rectangle");
    }
}
