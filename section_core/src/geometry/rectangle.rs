//! Rectangular block fiber
//!
//! The block is split into horizontal strips integrated with the midpoint
//! rule. Within a strip the strain is taken at its mid-height, which
//! resolves the peak and yield transitions once the strip count reaches a
//! few tens.

use std::sync::Arc;

use super::{validate_center, FiberGeometry, FiberResponse, GeometryRole};
use crate::equations::section::rectangular_area;
use crate::equations::strain::lever_arm;
use crate::errors::{require_positive, SectionError, SectionResult};
use crate::materials::{Material, StressStrain};
use crate::state::{SectionForces, StrainPlane};

/// Default number of integration strips
pub const DEFAULT_SLICES: usize = 100;

/// Upper bound on integration strips per rectangle
pub const MAX_SLICES: usize = 10_000;

/// Rectangular block (typically concrete).
#[derive(Debug, Clone, PartialEq)]
pub struct RectSection {
    material: Arc<Material>,
    center: [f64; 2],
    width: f64,
    height: f64,
    slices: usize,
    label: Option<String>,
}

impl RectSection {
    /// Create a block of `width` × `height` centered at `center`.
    pub fn new(material: Arc<Material>, center: [f64; 2], width: f64, height: f64) -> SectionResult<Self> {
        validate_center(center)?;
        require_positive("width", width)?;
        require_positive("height", height)?;
        Ok(RectSection {
            material,
            center,
            width,
            height,
            slices: DEFAULT_SLICES,
            label: None,
        })
    }

    /// Override the number of integration strips.
    pub fn with_slices(mut self, slices: usize) -> SectionResult<Self> {
        if slices == 0 {
            return Err(SectionError::invalid_input(
                "slices",
                slices.to_string(),
                "At least one integration strip is required",
            ));
        }
        if slices > MAX_SLICES {
            return Err(SectionError::invalid_input(
                "slices",
                slices.to_string(),
                format!("At most {MAX_SLICES} integration strips are allowed"),
            ));
        }
        self.slices = slices;
        Ok(self)
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn slices(&self) -> usize {
        self.slices
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn bottom(&self) -> f64 {
        self.center[1] - 0.5 * self.height
    }

    fn top(&self) -> f64 {
        self.center[1] + 0.5 * self.height
    }
}

impl FiberGeometry for RectSection {
    fn area(&self) -> f64 {
        rectangular_area(self.width, self.height)
    }

    fn centroid(&self) -> [f64; 2] {
        self.center
    }

    fn extent(&self) -> (f64, f64) {
        (self.bottom(), self.top())
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn role(&self) -> GeometryRole {
        GeometryRole::Concrete
    }

    fn strain_at(&self, plane: &StrainPlane, y_ref: f64) -> f64 {
        plane.strain_at(self.center[1], y_ref)
    }

    fn contribution(&self, plane: &StrainPlane, y_ref: f64) -> SectionForces {
        let dy = self.height / self.slices as f64;
        let strip_area = self.width * dy;
        let y0 = self.bottom();
        let mut forces = SectionForces::default();
        for i in 0..self.slices {
            let y = y0 + (i as f64 + 0.5) * dy;
            let dn = self.material.stress(plane.strain_at(y, y_ref)) * strip_area;
            forces += SectionForces::from_fiber(dn, lever_arm(y, y_ref));
        }
        forces
    }

    fn response(&self, plane: &StrainPlane, y_ref: f64) -> FiberResponse {
        let (y_bottom, y_top) = self.extent();
        let strain_bottom = plane.strain_at(y_bottom, y_ref);
        let strain_top = plane.strain_at(y_top, y_ref);
        let forces = self.contribution(plane, y_ref);
        FiberResponse {
            label: self.label.clone(),
            role: self.role(),
            y_bottom,
            y_top,
            strain_bottom,
            strain_top,
            stress_bottom: self.material.stress(strain_bottom),
            stress_top: self.material.stress(strain_top),
            normal: forces.normal,
            moment: forces.moment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Concrete, SteelIdeal};

    fn concrete() -> Arc<Material> {
        Arc::new(Material::Concrete(Concrete::new(40.0e6).unwrap()))
    }

    #[test]
    fn test_area_and_extent() {
        let rect = RectSection::new(concrete(), [0.0, 0.25], 0.3, 0.5).unwrap();
        assert!((rect.area() - 0.15).abs() < 1e-12);
        assert_eq!(rect.extent(), (0.0, 0.5));
        assert_eq!(rect.centroid(), [0.0, 0.25]);
    }

    #[test]
    fn test_uniform_compression_is_exact() {
        let rect = RectSection::new(concrete(), [0.0, 0.25], 0.3, 0.5).unwrap();
        let forces = rect.contribution(&StrainPlane::new(-0.003, 0.0), 0.25);
        assert!((forces.normal + 40.0e6 * 0.15).abs() < 1e-3);
        assert!(forces.moment.abs() < 1e-3);
    }

    #[test]
    fn test_elastic_block_matches_closed_form() {
        // Linear material: N = E A e0, M = E I k about the block centroid
        let steel = Arc::new(Material::SteelIdeal(SteelIdeal {
            young: 200.0e9,
            fy: 1.0e12,
            ultimate_strain: 10.0,
        }));
        let rect = RectSection::new(steel, [0.0, 0.0], 0.2, 0.4).unwrap();
        let e = 200.0e9;
        let forces = rect.contribution(&StrainPlane::new(1.0e-4, 1.0e-3), 0.0);
        assert!((forces.normal - e * 0.08 * 1.0e-4).abs() < 1.0);
        let inertia = 0.2 * 0.4_f64.powi(3) / 12.0;
        // Midpoint rule underestimates I by a relative 1/n²
        let expected = e * inertia * 1.0e-3;
        assert!((forces.moment - expected).abs() / expected < 2.0e-4);
    }

    #[test]
    fn test_tension_side_carries_nothing() {
        let rect = RectSection::new(concrete(), [0.0, 0.25], 0.3, 0.5).unwrap();
        let forces = rect.contribution(&StrainPlane::new(0.001, 0.0), 0.25);
        assert_eq!(forces, SectionForces::default());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(RectSection::new(concrete(), [0.0, 0.0], 0.0, 0.5).is_err());
        assert!(RectSection::new(concrete(), [0.0, 0.0], 0.3, -0.5).is_err());
        assert!(RectSection::new(concrete(), [f64::NAN, 0.0], 0.3, 0.5).is_err());
        let rect = RectSection::new(concrete(), [0.0, 0.0], 0.3, 0.5).unwrap();
        assert!(rect.with_slices(0).is_err());
    }

    #[test]
    fn test_slice_count_is_bounded() {
        let rect = RectSection::new(concrete(), [0.0, 0.0], 0.3, 0.5).unwrap();
        assert_eq!(rect.clone().with_slices(MAX_SLICES).unwrap().slices(), MAX_SLICES);
        let err = rect.with_slices(MAX_SLICES + 1).unwrap_err();
        assert!(matches!(err, SectionError::InvalidInput { ref field, .. } if field == "slices"));
    }

    #[test]
    fn test_response_edges() {
        let rect = RectSection::new(concrete(), [0.0, 0.25], 0.3, 0.5)
            .unwrap()
            .with_label("Web");
        let response = rect.response(&StrainPlane::new(0.0, 0.01), 0.25);
        assert_eq!(response.label.as_deref(), Some("Web"));
        assert!((response.strain_top + 0.0025).abs() < 1e-15);
        assert!((response.strain_bottom - 0.0025).abs() < 1e-15);
        assert_eq!(response.stress_bottom, 0.0);
        assert!(response.stress_top < 0.0);
        assert!(response.moment > 0.0);
    }
}
