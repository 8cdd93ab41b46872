//! # Fiber Geometries
//!
//! The building blocks of a section. Each geometry owns a shared handle to
//! its material and knows how to integrate its own contribution to the
//! section resultants for a given strain plane.
//!
//! ## Geometry Types
//!
//! - **RectSection**: rectangular block, integrated in horizontal strips
//! - **Rebar**: single point fiber (reinforcing bar)
//! - **Tendon**: point fiber with a prestressing initial strain
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use section_core::geometry::{FiberGeometry, Geometry, Rebar};
//! use section_core::materials::{Material, SteelIdeal};
//! use section_core::state::StrainPlane;
//!
//! let steel = Arc::new(Material::SteelIdeal(SteelIdeal::new(200.0e9, 400.0e6).unwrap()));
//! let bar = Geometry::Rebar(Rebar::new(steel, [0.0, 0.05], 0.02).unwrap());
//!
//! let forces = bar.contribution(&StrainPlane::new(0.001, 0.0), 0.25);
//! assert!((forces.normal - 200.0e6 * bar.area()).abs() < 1e-6);
//! ```

pub mod bar;
pub mod rectangle;

pub use bar::{Rebar, Tendon};
pub use rectangle::{RectSection, DEFAULT_SLICES};

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, SectionResult};
use crate::materials::Material;
use crate::state::{SectionForces, StrainPlane};

/// Capability shared by every fiber geometry.
///
/// `y_ref` is the height of the bending axis, normally the section
/// centroid. Implementations must be pure functions of their arguments.
pub trait FiberGeometry {
    /// Cross-sectional area (m²)
    fn area(&self) -> f64;

    /// Geometric centroid `[x, y]`
    fn centroid(&self) -> [f64; 2];

    /// Vertical extent `(y_min, y_max)`
    fn extent(&self) -> (f64, f64);

    /// Material of the fibers
    fn material(&self) -> &Material;

    /// Role used when classifying areas and picking strain limits
    fn role(&self) -> GeometryRole;

    /// Material strain at the geometry centroid.
    fn strain_at(&self, plane: &StrainPlane, y_ref: f64) -> f64;

    /// Axial force and moment about `y_ref` produced by the plane.
    fn contribution(&self, plane: &StrainPlane, y_ref: f64) -> SectionForces;

    /// Per-geometry strains, stresses, and resultants for reporting.
    fn response(&self, plane: &StrainPlane, y_ref: f64) -> FiberResponse;
}

/// What a geometry represents in the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryRole {
    Concrete,
    Rebar,
    Tendon,
}

/// Geometry type tags accepted in section descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    RectSection,
    Rebar,
    Tendon,
}

/// Response of a single geometry under a strain plane.
///
/// Point fibers report identical bottom and top values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberResponse {
    pub label: Option<String>,
    pub role: GeometryRole,
    pub y_bottom: f64,
    pub y_top: f64,
    pub strain_bottom: f64,
    pub strain_top: f64,
    /// Stress at the bottom edge (Pa)
    pub stress_bottom: f64,
    /// Stress at the top edge (Pa)
    pub stress_top: f64,
    /// Axial force carried by the geometry (N)
    pub normal: f64,
    /// Moment about the section reference axis (N·m)
    pub moment: f64,
}

/// Any fiber geometry a section can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect(RectSection),
    Rebar(Rebar),
    Tendon(Tendon),
}

impl Geometry {
    /// Display label, if one was given
    pub fn label(&self) -> Option<&str> {
        match self {
            Geometry::Rect(g) => g.label(),
            Geometry::Rebar(g) => g.label(),
            Geometry::Tendon(g) => g.label(),
        }
    }

    /// Initial strain added to the plane strain (zero except for tendons)
    pub fn initial_strain(&self) -> f64 {
        match self {
            Geometry::Tendon(g) => g.initial_strain(),
            _ => 0.0,
        }
    }

    fn inner(&self) -> &dyn FiberGeometry {
        match self {
            Geometry::Rect(g) => g,
            Geometry::Rebar(g) => g,
            Geometry::Tendon(g) => g,
        }
    }
}

impl FiberGeometry for Geometry {
    fn area(&self) -> f64 {
        self.inner().area()
    }

    fn centroid(&self) -> [f64; 2] {
        self.inner().centroid()
    }

    fn extent(&self) -> (f64, f64) {
        self.inner().extent()
    }

    fn material(&self) -> &Material {
        self.inner().material()
    }

    fn role(&self) -> GeometryRole {
        self.inner().role()
    }

    fn strain_at(&self, plane: &StrainPlane, y_ref: f64) -> f64 {
        self.inner().strain_at(plane, y_ref)
    }

    fn contribution(&self, plane: &StrainPlane, y_ref: f64) -> SectionForces {
        self.inner().contribution(plane, y_ref)
    }

    fn response(&self, plane: &StrainPlane, y_ref: f64) -> FiberResponse {
        self.inner().response(plane, y_ref)
    }
}

impl From<RectSection> for Geometry {
    fn from(g: RectSection) -> Self {
        Geometry::Rect(g)
    }
}

impl From<Rebar> for Geometry {
    fn from(g: Rebar) -> Self {
        Geometry::Rebar(g)
    }
}

impl From<Tendon> for Geometry {
    fn from(g: Tendon) -> Self {
        Geometry::Tendon(g)
    }
}

pub(crate) fn validate_center(center: [f64; 2]) -> SectionResult<()> {
    require_finite("center.x", center[0])?;
    require_finite("center.y", center[1])?;
    Ok(())
}
