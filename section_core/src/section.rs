//! # Section
//!
//! An ordered collection of fiber geometries with a fixed reference axis.
//! The centroid is computed once at construction and every strain plane is
//! measured about it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use section_core::geometry::{Rebar, RectSection};
//! use section_core::materials::{Concrete, Material, SteelIdeal};
//! use section_core::section::Section;
//! use section_core::state::StrainPlane;
//!
//! let concrete = Arc::new(Material::Concrete(Concrete::new(40.0e6).unwrap()));
//! let steel = Arc::new(Material::SteelIdeal(SteelIdeal::new(200.0e9, 400.0e6).unwrap()));
//!
//! let section = Section::new(vec![
//!     RectSection::new(concrete, [0.0, 0.25], 0.3, 0.5).unwrap().into(),
//!     Rebar::new(Arc::clone(&steel), [-0.11, 0.04], 0.02).unwrap().into(),
//!     Rebar::new(steel, [0.11, 0.04], 0.02).unwrap().into(),
//! ]);
//!
//! let centroid = section.centroid().unwrap();
//! assert!(centroid.y < 0.25);
//!
//! let forces = section.evaluate(&StrainPlane::default()).unwrap();
//! assert_eq!(forces.normal, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};
use crate::geometry::{FiberGeometry, FiberResponse, Geometry, GeometryRole};
use crate::materials::StressStrain;
use crate::state::{SectionForces, StrainPlane};

/// Area-weighted centroid of a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

/// Centroid and areas by geometry role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryProperties {
    pub centroid: Centroid,
    /// Gross area of concrete-role geometries (m²)
    pub area_concrete: f64,
    /// Area of reinforcing bars (m²)
    pub area_rebar: f64,
    /// Area of prestressing tendons (m²)
    pub area_tendon: f64,
}

impl GeometryProperties {
    /// Sum of all areas
    pub fn total_area(&self) -> f64 {
        self.area_concrete + self.area_rebar + self.area_tendon
    }

    /// Reinforcement ratio (rebar + tendon) over concrete area
    pub fn reinforcement_ratio(&self) -> f64 {
        if self.area_concrete > 0.0 {
            (self.area_rebar + self.area_tendon) / self.area_concrete
        } else {
            0.0
        }
    }
}

/// Fiber section.
///
/// Immutable after construction. Materials are shared through `Arc`, so a
/// section can be sent to, and evaluated from, several threads at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    geometries: Vec<Geometry>,
    centroid: Option<Centroid>,
}

impl Section {
    /// Build a section and compute its centroid.
    pub fn new(geometries: Vec<Geometry>) -> Self {
        let centroid = compute_centroid(&geometries);
        if centroid.is_none() {
            log::debug!("section with {} geometries has no centroid", geometries.len());
        }
        Section { geometries, centroid }
    }

    /// Geometries in insertion order
    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Reference point of every strain plane.
    ///
    /// Fails with SectionUnstable for an empty or zero-area section.
    pub fn centroid(&self) -> SectionResult<Centroid> {
        self.centroid
            .ok_or_else(|| SectionError::unstable("section has no geometry with positive area"))
    }

    /// Axial force and moment about the centroid produced by `plane`.
    pub fn evaluate(&self, plane: &StrainPlane) -> SectionResult<SectionForces> {
        let y_ref = self.centroid()?.y;
        Ok(self.integrate(plane, y_ref))
    }

    pub(crate) fn integrate(&self, plane: &StrainPlane, y_ref: f64) -> SectionForces {
        self.geometries.iter().map(|g| g.contribution(plane, y_ref)).sum()
    }

    /// Per-geometry strains, stresses, and resultants, in insertion order.
    pub fn fiber_responses(&self, plane: &StrainPlane) -> SectionResult<Vec<FiberResponse>> {
        let y_ref = self.centroid()?.y;
        Ok(self.geometries.iter().map(|g| g.response(plane, y_ref)).collect())
    }

    /// Centroid and areas grouped by role.
    pub fn geometry_properties(&self) -> SectionResult<GeometryProperties> {
        let centroid = self.centroid()?;
        let mut properties = GeometryProperties {
            centroid,
            area_concrete: 0.0,
            area_rebar: 0.0,
            area_tendon: 0.0,
        };
        for geometry in &self.geometries {
            match geometry.role() {
                GeometryRole::Concrete => properties.area_concrete += geometry.area(),
                GeometryRole::Rebar => properties.area_rebar += geometry.area(),
                GeometryRole::Tendon => properties.area_tendon += geometry.area(),
            }
        }
        Ok(properties)
    }

    /// Lowest and highest fiber heights.
    pub fn extent(&self) -> SectionResult<(f64, f64)> {
        self.centroid()?;
        let (lo, hi) = self
            .geometries
            .iter()
            .map(|g| g.extent())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        Ok((lo, hi))
    }

    /// Depth used to scale curvature in the solver (1.0 for a flat section)
    pub(crate) fn depth(&self) -> SectionResult<f64> {
        let (lo, hi) = self.extent()?;
        let depth = hi - lo;
        Ok(if depth > 0.0 { depth } else { 1.0 })
    }

    /// Σ A·peak_stress, the squash load magnitude.
    pub fn force_scale(&self) -> f64 {
        self.geometries.iter().map(|g| g.area() * g.material().peak_stress()).sum()
    }

    /// Largest fiber strain magnitude, measured on the plane, before every
    /// material law has reached its failure strain.
    pub fn failure_strain(&self) -> f64 {
        self.geometries
            .iter()
            .map(|g| g.material().failure_strain() + g.initial_strain().abs())
            .fold(0.0, f64::max)
    }

    /// Attainable axial force range `(min, max)`.
    ///
    /// Bounds only: the actual limits may be tighter once the strain
    /// ordering of the fibers is taken into account.
    pub fn axial_limits(&self) -> (f64, f64) {
        let tension: f64 = self
            .geometries
            .iter()
            .map(|g| g.area() * g.material().tensile_strength())
            .sum();
        (-self.force_scale(), tension)
    }
}

fn compute_centroid(geometries: &[Geometry]) -> Option<Centroid> {
    let (area, sx, sy) = geometries.iter().fold((0.0, 0.0, 0.0), |(a, sx, sy), g| {
        let area = g.area();
        let [x, y] = g.centroid();
        (a + area, sx + area * x, sy + area * y)
    });
    if area > 0.0 && area.is_finite() {
        Some(Centroid {
            x: sx / area,
            y: sy / area,
        })
    } else {
        None
    }
}
