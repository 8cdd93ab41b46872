//! # Error Types
//!
//! Structured error types for section_core. Every failure carries enough
//! context for a caller to decide what to do next: fix the input, accept
//! that the section cannot carry the load, or retry a solve with a larger
//! iteration budget.
//!
//! ## Failure kinds
//!
//! - **InvalidInput**: malformed descriptors, unknown material names,
//!   out-of-domain parameters. Never worth retrying.
//! - **SectionUnstable**: no equilibrium strain state exists for the
//!   requested target (degenerate section, target beyond capacity,
//!   singular response).
//! - **ConvergenceFailure**: an equilibrium may exist but the iteration
//!   budget ran out first.
//!
//! ## Example
//!
//! ```rust
//! use section_core::errors::{SectionError, SectionResult};
//!
//! fn validate_width(width: f64) -> SectionResult<()> {
//!     if !(width > 0.0) {
//!         return Err(SectionError::invalid_input(
//!             "width",
//!             width.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(-0.3).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for section_core operations
pub type SectionResult<T> = Result<T, SectionError>;

/// Coarse classification of a [`SectionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request itself is malformed
    InvalidInput,
    /// No equilibrium exists for the request
    SectionUnstable,
    /// The solver ran out of iterations
    ConvergenceFailure,
}

/// Structured error type for section construction and analysis.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SectionError {
    /// An input value is invalid (out of range, non-finite, malformed)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A geometry references a material name that was never defined
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Two material descriptors share a name
    #[error("Duplicate material name: {material_name}")]
    DuplicateMaterial { material_name: String },

    /// No equilibrium strain state exists for the request
    #[error("Section unstable: {reason}")]
    SectionUnstable { reason: String },

    /// The iteration budget was exhausted before meeting the tolerance
    #[error(
        "{analysis} did not converge after {iterations} iterations \
         (residual N = {residual_normal:.3e}, M = {residual_moment:.3e})"
    )]
    ConvergenceFailure {
        analysis: String,
        iterations: usize,
        residual_normal: f64,
        residual_moment: f64,
    },
}

impl SectionError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        SectionError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a DuplicateMaterial error
    pub fn duplicate_material(material_name: impl Into<String>) -> Self {
        SectionError::DuplicateMaterial {
            material_name: material_name.into(),
        }
    }

    /// Create a SectionUnstable error
    pub fn unstable(reason: impl Into<String>) -> Self {
        SectionError::SectionUnstable {
            reason: reason.into(),
        }
    }

    /// Create a ConvergenceFailure error
    pub fn convergence_failure(
        analysis: impl Into<String>,
        iterations: usize,
        residual_normal: f64,
        residual_moment: f64,
    ) -> Self {
        SectionError::ConvergenceFailure {
            analysis: analysis.into(),
            iterations,
            residual_normal,
            residual_moment,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SectionError::InvalidInput { .. }
            | SectionError::MaterialNotFound { .. }
            | SectionError::DuplicateMaterial { .. } => ErrorKind::InvalidInput,
            SectionError::SectionUnstable { .. } => ErrorKind::SectionUnstable,
            SectionError::ConvergenceFailure { .. } => ErrorKind::ConvergenceFailure,
        }
    }

    /// Check if this is a recoverable error (retrying with a larger
    /// iteration budget may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SectionError::ConvergenceFailure { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SectionError::InvalidInput { .. } => "INVALID_INPUT",
            SectionError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            SectionError::DuplicateMaterial { .. } => "DUPLICATE_MATERIAL",
            SectionError::SectionUnstable { .. } => "SECTION_UNSTABLE",
            SectionError::ConvergenceFailure { .. } => "CONVERGENCE_FAILURE",
        }
    }
}

/// Reject NaN and infinite parameters with an InvalidInput error.
pub(crate) fn require_finite(field: &str, value: f64) -> SectionResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SectionError::invalid_input(field, value.to_string(), "Value must be finite"))
    }
}

/// Reject non-positive (or non-finite) parameters with an InvalidInput error.
pub(crate) fn require_positive(field: &str, value: f64) -> SectionResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SectionError::invalid_input(field, value.to_string(), "Value must be positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = SectionError::invalid_input("width", "-0.3", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: SectionError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SectionError::material_not_found("C40").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(SectionError::unstable("empty").error_code(), "SECTION_UNSTABLE");
    }

    #[test]
    fn test_instability_and_convergence_are_distinct() {
        let unstable = SectionError::unstable("singular jacobian");
        let stalled = SectionError::convergence_failure("check_section", 50, 1.0e-3, 2.0e-4);
        assert_eq!(unstable.kind(), ErrorKind::SectionUnstable);
        assert_eq!(stalled.kind(), ErrorKind::ConvergenceFailure);
        assert!(stalled.is_recoverable());
        assert!(!unstable.is_recoverable());
        assert_eq!(SectionError::material_not_found("x").kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_convergence_message_reports_context() {
        let error = SectionError::convergence_failure("check_section", 12, 1.5, -0.25);
        let message = error.to_string();
        assert!(message.contains("12 iterations"));
        assert!(message.contains("check_section"));
    }

    #[test]
    fn test_require_finite_and_positive() {
        assert!(require_finite("k_max", f64::NAN).is_err());
        assert_eq!(require_finite("k_max", -1.0).unwrap(), -1.0);
        assert!(require_positive("fc", 0.0).is_err());
        assert!(require_positive("fc", f64::INFINITY).is_err());
        assert_eq!(require_positive("fc", 40.0e6).unwrap(), 40.0e6);
    }
}
