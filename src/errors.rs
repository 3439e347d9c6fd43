//! Error Types
//!
//! This module defines the error types used throughout the composition layer.
//!
//! # Overview
//!
//! The main error type [`AvatarError`] covers the failure modes that can
//! actually surface to a caller:
//! - Asset fetching and decoding errors
//! - Configuration and color parsing errors
//! - Overlay synthesis failures
//! - Preference persistence errors
//!
//! Steady-state composition operations (swapping styles, recoloring, playing
//! animations) never return these; they log and degrade to a no-op so the
//! frame loop keeps running.
//!
//! ```rust,ignore
//! use myth_avatar::errors::{AvatarError, Result};
//!
//! fn load_settings() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the composition layer.
#[derive(Error, Debug)]
pub enum AvatarError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The asset was read but its contents cannot be used.
    #[error("Unsupported asset '{path}': {reason}")]
    UnsupportedAsset {
        /// Path or URI of the asset
        path: String,
        /// What was wrong with it
        reason: String,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A color value could not be normalized.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Category table or settings are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Composition Errors
    // ========================================================================
    /// An overlay part could not be synthesized.
    #[error("Failed to synthesize overlay '{style}': {reason}")]
    SynthesisFailed {
        /// Style name that was requested
        style: String,
        /// Missing precondition
        reason: String,
    },

    // ========================================================================
    // Preference Errors
    // ========================================================================
    /// Preference store could not be read or written.
    #[error("Preference store error: {0}")]
    PreferenceError(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for AvatarError {
    fn from(err: image::ImageError) -> Self {
        AvatarError::ImageDecodeError(err.to_string())
    }
}

impl From<gltf::Error> for AvatarError {
    fn from(err: gltf::Error) -> Self {
        AvatarError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, AvatarError>`.
pub type Result<T> = std::result::Result<T, AvatarError>;
