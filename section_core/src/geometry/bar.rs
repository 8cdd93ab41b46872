//! Point fibers: reinforcing bars and prestressing tendons
//!
//! A bar is a single fiber of circular cross-section lumped at its center.
//! A tendon is a bar whose material also sees a fixed initial strain from
//! prestressing, superimposed on the section strain plane.

use std::sync::Arc;

use super::{validate_center, FiberGeometry, FiberResponse, GeometryRole};
use crate::equations::section::circular_area;
use crate::equations::strain::lever_arm;
use crate::errors::{require_finite, require_positive, SectionResult};
use crate::materials::{Material, StressStrain};
use crate::state::{SectionForces, StrainPlane};

/// Reinforcing bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebar {
    material: Arc<Material>,
    center: [f64; 2],
    diameter: f64,
    label: Option<String>,
}

impl Rebar {
    /// Create a bar of `diameter` at `center`.
    pub fn new(material: Arc<Material>, center: [f64; 2], diameter: f64) -> SectionResult<Self> {
        validate_center(center)?;
        require_positive("diameter", diameter)?;
        Ok(Rebar {
            material,
            center,
            diameter,
            label: None,
        })
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl FiberGeometry for Rebar {
    fn area(&self) -> f64 {
        circular_area(self.diameter)
    }

    fn centroid(&self) -> [f64; 2] {
        self.center
    }

    fn extent(&self) -> (f64, f64) {
        (self.center[1], self.center[1])
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn role(&self) -> GeometryRole {
        GeometryRole::Rebar
    }

    fn strain_at(&self, plane: &StrainPlane, y_ref: f64) -> f64 {
        plane.strain_at(self.center[1], y_ref)
    }

    fn contribution(&self, plane: &StrainPlane, y_ref: f64) -> SectionForces {
        let y = self.center[1];
        let dn = self.material.stress(self.strain_at(plane, y_ref)) * self.area();
        SectionForces::from_fiber(dn, lever_arm(y, y_ref))
    }

    fn response(&self, plane: &StrainPlane, y_ref: f64) -> FiberResponse {
        point_response(self, self.label.clone(), plane, y_ref)
    }
}

/// Prestressing tendon with a fixed initial strain.
#[derive(Debug, Clone, PartialEq)]
pub struct Tendon {
    bar: Rebar,
    initial_strain: f64,
}

impl Tendon {
    /// Create a tendon of `diameter` at `center`, pre-strained by
    /// `initial_strain` (positive for the usual tensioned strand).
    pub fn new(material: Arc<Material>, center: [f64; 2], diameter: f64, initial_strain: f64) -> SectionResult<Self> {
        require_finite("initial_strain", initial_strain)?;
        Ok(Tendon {
            bar: Rebar::new(material, center, diameter)?,
            initial_strain,
        })
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.bar = self.bar.with_label(label);
        self
    }

    pub fn diameter(&self) -> f64 {
        self.bar.diameter
    }

    pub fn initial_strain(&self) -> f64 {
        self.initial_strain
    }

    pub fn label(&self) -> Option<&str> {
        self.bar.label()
    }
}

impl FiberGeometry for Tendon {
    fn area(&self) -> f64 {
        self.bar.area()
    }

    fn centroid(&self) -> [f64; 2] {
        self.bar.center
    }

    fn extent(&self) -> (f64, f64) {
        self.bar.extent()
    }

    fn material(&self) -> &Material {
        &self.bar.material
    }

    fn role(&self) -> GeometryRole {
        GeometryRole::Tendon
    }

    /// Total material strain: section strain plus prestrain
    fn strain_at(&self, plane: &StrainPlane, y_ref: f64) -> f64 {
        self.bar.strain_at(plane, y_ref) + self.initial_strain
    }

    fn contribution(&self, plane: &StrainPlane, y_ref: f64) -> SectionForces {
        let y = self.bar.center[1];
        let dn = self.bar.material.stress(self.strain_at(plane, y_ref)) * self.area();
        SectionForces::from_fiber(dn, lever_arm(y, y_ref))
    }

    fn response(&self, plane: &StrainPlane, y_ref: f64) -> FiberResponse {
        point_response(self, self.bar.label.clone(), plane, y_ref)
    }
}

fn point_response<G: FiberGeometry>(
    fiber: &G,
    label: Option<String>,
    plane: &StrainPlane,
    y_ref: f64,
) -> FiberResponse {
    let y = fiber.centroid()[1];
    let strain = fiber.strain_at(plane, y_ref);
    let stress = fiber.material().stress(strain);
    let forces = fiber.contribution(plane, y_ref);
    FiberResponse {
        label,
        role: fiber.role(),
        y_bottom: y,
        y_top: y,
        strain_bottom: strain,
        strain_top: strain,
        stress_bottom: stress,
        stress_top: stress,
        normal: forces.normal,
        moment: forces.moment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{SteelHardening, SteelIdeal};

    fn b500() -> Arc<Material> {
        Arc::new(Material::SteelIdeal(SteelIdeal::new(200.0e9, 500.0e6).unwrap()))
    }

    #[test]
    fn test_rebar_area() {
        let bar = Rebar::new(b500(), [0.1, 0.05], 0.02).unwrap();
        assert!((bar.area() - std::f64::consts::PI * 1.0e-4).abs() < 1e-15);
        assert_eq!(bar.extent(), (0.05, 0.05));
    }

    #[test]
    fn test_rebar_yields_in_tension() {
        let bar = Rebar::new(b500(), [0.0, 0.05], 0.02).unwrap();
        let forces = bar.contribution(&StrainPlane::new(0.01, 0.0), 0.25);
        let expected = 500.0e6 * bar.area();
        assert!((forces.normal - expected).abs() < 1e-6);
        // Below the axis: tension gives a sagging moment
        assert!((forces.moment - expected * 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_tendon_prestrain_acts_at_zero_plane() {
        let strand = Arc::new(Material::SteelHardening(
            SteelHardening::new(200.0e9, 1500.0e6, 1700.0e6, 0.035).unwrap(),
        ));
        let tendon = Tendon::new(strand, [0.0, 0.1], 0.015, 0.005).unwrap();
        let forces = tendon.contribution(&StrainPlane::default(), 0.25);
        assert!((forces.normal - 1000.0e6 * tendon.area()).abs() < 1e-3);
        assert!(forces.moment > 0.0);
        let response = tendon.response(&StrainPlane::default(), 0.25);
        assert_eq!(response.role, GeometryRole::Tendon);
        assert!((response.strain_top - 0.005).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_bars() {
        assert!(Rebar::new(b500(), [0.0, 0.0], 0.0).is_err());
        assert!(Rebar::new(b500(), [0.0, f64::INFINITY], 0.02).is_err());
        assert!(Tendon::new(b500(), [0.0, 0.0], 0.015, f64::NAN).is_err());
    }
}
