//! # Fiber Area Formulas
//!
//! Areas of the primitive shapes a section is assembled from.

use std::f64::consts::PI;

/// Area of a rectangular block
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │    +    │ ← center
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// A = b × h
///
/// # Example
/// ```rust
/// use section_core::equations::section::rectangular_area;
///
/// let area = rectangular_area(0.3, 0.5);
/// assert!((area - 0.15).abs() < 1e-12);
/// ```
#[inline]
pub fn rectangular_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Area of a round bar or strand
///
/// # Formula
/// A = π d² / 4
///
/// # Example
/// ```rust
/// use section_core::equations::section::circular_area;
///
/// // 20 mm bar
/// let area = circular_area(0.02);
/// assert!((area - 3.14159e-4).abs() < 1e-8);
/// ```
#[inline]
pub fn circular_area(d: f64) -> f64 {
    PI * d * d / 4.0
}
