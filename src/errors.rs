//! Error Types
//!
//! This module defines the error types used by the converter.
//!
//! # Overview
//!
//! The conversion pass itself is infallible once it has a valid root: defective
//! geometry is skipped and unsupported values are omitted. [`ConvertError`]
//! therefore only covers the edges of the pass:
//! - Looking up the root node of a conversion
//! - Loading and validating [`ConvertSettings`](crate::settings::ConvertSettings)
//!
//! # Usage
//!
//! ```rust,ignore
//! use sgconv::errors::Result;
//!
//! fn run() -> Result<()> {
//!     let settings = sgconv::ConvertSettings::from_path("convert.json")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::NodeKey;

/// The main error type for the converter.
#[derive(Error, Debug)]
pub enum ConvertError {
    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// The requested node does not exist in the source scene.
    #[error("Node not found in source scene: {0:?}")]
    NodeNotFound(NodeKey),

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;
