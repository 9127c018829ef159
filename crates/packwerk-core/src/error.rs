// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Packwerk.

use thiserror::Error;

/// Top-level error type for all Packwerk operations.
///
/// Batch imports from a directory or archive treat `UnsupportedFormat` and
/// `DecodeFailed` as per-entry errors (logged and skipped), while
/// `ContainerCorrupt` and `Io` abort the whole import. Exports have no
/// partial-success mode: any error means the destination must be discarded.
#[derive(Debug, Error)]
pub enum PackwerkError {
    /// Bytes or extension did not match any supported still-image codec.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Codec was recognized but the payload could not be decoded.
    #[error("image decode failed: {0}")]
    DecodeFailed(String),

    /// Re-encoding a page during export failed.
    #[error("image encode failed: {0}")]
    EncodeFailed(String),

    /// Malformed zip or PDF structure.
    #[error("container is corrupt: {0}")]
    ContainerCorrupt(String),

    /// Underlying read/write failure.
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PackwerkError>;
