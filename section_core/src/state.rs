//! # Strain-Plane State
//!
//! The two quantities every analysis passes around: the strain plane
//! `(e0, k)` and the force resultants `(N, M)` it produces. Both are plain
//! `Copy` values that serialize as flat JSON objects.
//!
//! ## Example
//!
//! ```rust
//! use section_core::state::{SectionForces, StrainPlane};
//!
//! let plane = StrainPlane::new(-0.001, 0.004);
//! assert!((plane.strain_at(0.5, 0.25) + 0.002).abs() < 1e-15);
//!
//! let total = SectionForces::new(-1.0e5, 2.0e4) + SectionForces::new(5.0e4, 1.0e4);
//! assert_eq!(total, SectionForces::new(-5.0e4, 3.0e4));
//! ```

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::equations::strain::strain_at;

/// Linear strain distribution over the section depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrainPlane {
    /// Strain at the reference axis (centroid)
    pub e0: f64,
    /// Curvature (1/m), positive when the top fiber shortens
    pub k: f64,
}

impl StrainPlane {
    pub fn new(e0: f64, k: f64) -> Self {
        StrainPlane { e0, k }
    }

    /// Strain at height `y` for the reference height `y_ref`
    #[inline]
    pub fn strain_at(&self, y: f64, y_ref: f64) -> f64 {
        strain_at(self.e0, self.k, y, y_ref)
    }

    /// True when both components are finite
    pub fn is_finite(&self) -> bool {
        self.e0.is_finite() && self.k.is_finite()
    }
}

/// Axial force and bending moment resultants.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionForces {
    /// Axial force (N), tension positive
    pub normal: f64,
    /// Bending moment about the reference axis (N·m), sagging positive
    pub moment: f64,
}

impl SectionForces {
    pub fn new(normal: f64, moment: f64) -> Self {
        SectionForces { normal, moment }
    }

    /// Resultants of a single fiber force `dn` acting with `lever_arm`
    #[inline]
    pub fn from_fiber(dn: f64, lever_arm: f64) -> Self {
        SectionForces {
            normal: dn,
            moment: dn * lever_arm,
        }
    }

    /// True when both components are finite
    pub fn is_finite(&self) -> bool {
        self.normal.is_finite() && self.moment.is_finite()
    }
}

impl Add for SectionForces {
    type Output = SectionForces;
    fn add(self, rhs: SectionForces) -> SectionForces {
        SectionForces::new(self.normal + rhs.normal, self.moment + rhs.moment)
    }
}

impl AddAssign for SectionForces {
    fn add_assign(&mut self, rhs: SectionForces) {
        self.normal += rhs.normal;
        self.moment += rhs.moment;
    }
}

impl Sub for SectionForces {
    type Output = SectionForces;
    fn sub(self, rhs: SectionForces) -> SectionForces {
        SectionForces::new(self.normal - rhs.normal, self.moment - rhs.moment)
    }
}

impl std::iter::Sum for SectionForces {
    fn sum<I: Iterator<Item = SectionForces>>(iter: I) -> SectionForces {
        iter.fold(SectionForces::default(), |acc, f| acc + f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiber_moment_sign() {
        // Tension below the axis is a sagging moment
        let below = SectionForces::from_fiber(1000.0, 0.2);
        assert_eq!(below.moment, 200.0);
        // Compression above the axis is also sagging
        let above = SectionForces::from_fiber(-1000.0, -0.2);
        assert_eq!(above.moment, 200.0);
    }

    #[test]
    fn test_sum_and_sub() {
        let parts = vec![SectionForces::new(1.0, 2.0), SectionForces::new(3.0, -1.0)];
        let total: SectionForces = parts.into_iter().sum();
        assert_eq!(total, SectionForces::new(4.0, 1.0));
        assert_eq!(total - SectionForces::new(4.0, 1.0), SectionForces::default());
    }

    #[test]
    fn test_plane_serialization() {
        let plane = StrainPlane::new(2.6e-4, 0.0147);
        let json = serde_json::to_string(&plane).unwrap();
        assert!(json.contains("\"e0\""));
        assert!(json.contains("\"k\""));
        let roundtrip: StrainPlane = serde_json::from_str(&json).unwrap();
        assert_eq!(plane, roundtrip);
    }
}
