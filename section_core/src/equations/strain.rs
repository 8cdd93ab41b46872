//! # Plane-Section Kinematics
//!
//! Plane sections remain plane: the strain varies linearly over the depth
//! of the section and is fully described by the strain `e0` at the
//! reference height and the curvature `k`.
//!
//! ```text
//!   y ▲        strain
//!     │  ●─────────────  ε_top = e0 - k (y_top - y_ref)
//!     │   ╲
//!     │    ╲
//! y_ref ────●─────────  e0
//!     │      ╲
//!     │       ╲
//!     │  ●─────●──────  ε_bot = e0 + k (y_ref - y_bot)
//! ```

/// Lever arm of a fiber at height `y` about the reference axis.
///
/// Positive below the axis, so that a tensile force below the axis produces
/// a positive (sagging) moment.
#[inline]
pub fn lever_arm(y: f64, y_ref: f64) -> f64 {
    y_ref - y
}

/// Strain at height `y` for the strain plane `(e0, k)`.
///
/// # Formula
/// ε(y) = e0 + k (y_ref - y)
///
/// # Example
/// ```rust
/// use section_core::equations::strain::strain_at;
///
/// // Positive curvature shortens the fiber above the axis
/// let top = strain_at(0.0, 0.01, 0.25, 0.0);
/// assert!((top + 0.0025).abs() < 1e-15);
/// ```
#[inline]
pub fn strain_at(e0: f64, k: f64, y: f64, y_ref: f64) -> f64 {
    e0 + k * lever_arm(y, y_ref)
}

/// Strain plane `(e0, k)` passing through strain `e1` at height `y1` and
/// strain `e2` at height `y2`.
///
/// The heights must differ; callers guarantee `y1 != y2`.
///
/// # Formula
/// k = (ε2 - ε1) / (y1 - y2), e0 = ε1 - k (y_ref - y1)
pub fn plane_through(y1: f64, e1: f64, y2: f64, e2: f64, y_ref: f64) -> (f64, f64) {
    let k = (e2 - e1) / (y1 - y2);
    let e0 = e1 - k * lever_arm(y1, y_ref);
    (e0, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strain_at_reference_is_e0() {
        assert_eq!(strain_at(-0.001, 0.02, 0.3, 0.3), -0.001);
    }

    #[test]
    fn test_plane_through_reproduces_both_points() {
        let (e0, k) = plane_through(0.5, -0.0035, 0.04, 0.01, 0.249);
        assert!((strain_at(e0, k, 0.5, 0.249) + 0.0035).abs() < 1e-15);
        assert!((strain_at(e0, k, 0.04, 0.249) - 0.01).abs() < 1e-15);
        // Compressed top means positive curvature
        assert!(k > 0.0);
    }

    #[test]
    fn test_uniform_plane_has_zero_curvature() {
        let (e0, k) = plane_through(0.0, -0.002, 0.5, -0.002, 0.25);
        assert_eq!(k, 0.0);
        assert!((e0 + 0.002).abs() < 1e-15);
    }
}
