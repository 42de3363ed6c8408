// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error taxonomy for the geometry core
//!
//! None of these cross the public geometry entry points: hull, boolean and
//! metric functions turn them into empty meshes or `None`. The `try_*`
//! variants surface them for callers that want to know why a result is absent.

use thiserror::Error;

/// Reasons a geometry computation produced nothing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Fewer points or shapes than the operation needs
    #[error("degenerate input: {details}")]
    DegenerateInput { details: String },

    /// A solid with (near) zero volume entered an IoU computation
    #[error("flat shape at index {index}: volume {volume:e}")]
    FlatShape { index: usize, volume: f64 },

    /// Near-parallel lines, coincident points or a vanishing determinant
    #[error("numeric degeneracy: {details}")]
    NumericDegeneracy { details: String },

    /// Unexpected failure inside a scheduled job
    #[error("computation failed: {details}")]
    ComputationFailure { details: String },
}

impl GeometryError {
    pub fn degenerate(details: impl Into<String>) -> Self {
        Self::DegenerateInput {
            details: details.into(),
        }
    }

    pub fn numeric(details: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            details: details.into(),
        }
    }

    pub fn failure(details: impl Into<String>) -> Self {
        Self::ComputationFailure {
            details: details.into(),
        }
    }
}

/// Result alias used throughout the core
pub type GeometryResult<T> = Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeometryError::degenerate("hull needs 3 points");
        assert_eq!(err.to_string(), "degenerate input: hull needs 3 points");

        let err = GeometryError::FlatShape {
            index: 2,
            volume: 0.0,
        };
        assert!(err.to_string().contains("index 2"));
    }
}
