/*!
 * Error types for the dscite application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

use crate::citation_format::CitationFormat;

/// Errors that can occur while converting a document
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The document matches no recognized citation dialect
    #[error("Unrecognized citation format")]
    UnknownFormat,

    /// The document is already in canonical footnote form
    #[error("Document already converted (format: {0})")]
    AlreadyConverted(CitationFormat),

    /// Backup creation failed; the destructive write was not attempted
    #[error("Backup failed, original file left unchanged: {0}")]
    BackupFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document conversion
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
