// Copyright 2025 Clusterscan Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared across the report model.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building or decoding a run report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The run was already finalized and rejects further mutation.
    #[error("run is already finalized")]
    AlreadyFinalized,

    /// A payload value failed validation for its variant.
    #[error("invalid payload for object `{object_id}`: {reason}")]
    InvalidPayload {
        /// Object the rejected result was addressed to.
        object_id: String,
        /// Human-readable rule that was violated.
        reason: String,
    },

    /// A check handle that was never issued by this builder.
    #[error("check handle {index} was not issued by this run")]
    UnknownCheck {
        /// Index carried by the stale handle.
        index: usize,
    },

    /// The input bytes are not a structurally valid report.
    #[error("malformed report bytes: {0}")]
    Decode(#[from] prost::DecodeError),
}
