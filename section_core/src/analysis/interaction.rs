//! # Interaction Envelope
//!
//! Axial force / bending moment capacity envelope by the pivot method.
//! Every point is a forward evaluation of an ultimate strain plane, so no
//! equilibrium iteration is involved.
//!
//! ## Ultimate planes
//!
//! The envelope is traced along a closed path `t ∈ [0, 6]`. The first half
//! has the top fiber in compression (sagging), the second half mirrors it
//! with the bottom fiber in compression (hogging) and returns to pure
//! tension:
//!
//! ```text
//!  region  t (sagging)   pivot                        moving strain
//!  1       0 → 1         tension steel at +εsu        face: +εsu → -εcu
//!  2       1 → 2         compressed face at -εcu      far face → 0
//!  3       2 → 3         C at (1 - εc2/εcu)·h, -εc2   face: -εcu → -εc2
//! ```
//!
//! The tension pivot is the outermost reinforcement on the tension half of
//! the depth, or the tension face when that half holds none.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::equations::strain::plane_through;
use crate::errors::{SectionError, SectionResult};
use crate::geometry::{FiberGeometry, GeometryRole};
use crate::materials::StressStrain;
use crate::section::Section;
use crate::settings::{require_count, SolverSettings};
use crate::state::StrainPlane;

/// Usable tensile strain when no reinforcement defines one
pub const DEFAULT_STEEL_LIMIT: f64 = 0.01;

/// Envelope sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionInput {
    /// Number of sampled planes; `None` uses the solver settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<usize>,
}

impl InteractionInput {
    pub fn new(points: usize) -> Self {
        InteractionInput { points: Some(points) }
    }

    pub fn validate(&self) -> SectionResult<()> {
        if let Some(points) = self.points {
            require_count("n_points", points, 2)?;
        }
        Ok(())
    }
}

/// Strain limits governing the ultimate planes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateStrains {
    /// Ultimate compressive strain magnitude
    pub eps_cu: f64,
    /// Compressive strain magnitude of pure compression
    pub eps_c2: f64,
    /// Usable tensile strain of the reinforcement
    pub eps_su: f64,
}

impl UltimateStrains {
    /// Limits of the least ductile materials in `section`.
    pub fn of(section: &Section) -> SectionResult<Self> {
        let geometries = section.geometries();
        let governing = geometries
            .iter()
            .filter(|g| g.role() == GeometryRole::Concrete)
            .map(|g| g.material())
            .min_by(|a, b| a.ultimate_compressive_strain().total_cmp(&b.ultimate_compressive_strain()));

        let (eps_cu, eps_c2) = match governing {
            Some(material) => (material.ultimate_compressive_strain(), material.peak_strain()),
            None => {
                let eps_cu = geometries
                    .iter()
                    .map(|g| g.material().ultimate_compressive_strain())
                    .fold(f64::INFINITY, f64::min);
                let eps_c2 = geometries
                    .iter()
                    .map(|g| g.material().peak_strain())
                    .fold(f64::INFINITY, f64::min);
                (eps_cu, eps_c2.min(eps_cu))
            }
        };

        let eps_su = geometries
            .iter()
            .filter(|g| g.role() != GeometryRole::Concrete)
            .filter_map(|g| g.material().ultimate_tensile_strain().map(|eu| eu - g.initial_strain()))
            .filter(|eu| *eu > 0.0)
            .fold(None, |m: Option<f64>, eu| Some(m.map_or(eu, |m| m.min(eu))))
            .unwrap_or(DEFAULT_STEEL_LIMIT);

        if !(eps_cu > 0.0 && eps_c2 > 0.0) || !eps_cu.is_finite() {
            return Err(SectionError::unstable("section has no compressive strain limit"));
        }
        Ok(UltimateStrains { eps_cu, eps_c2, eps_su })
    }
}

/// Capacity envelope, ordered along the pivot path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionResult {
    /// Axial force at each point (N)
    pub normal: Vec<f64>,
    /// Moment at each point (N·m)
    pub moment: Vec<f64>,
    /// Ultimate strain plane of each point
    pub planes: Vec<StrainPlane>,
}

impl InteractionResult {
    pub fn len(&self) -> usize {
        self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normal.is_empty()
    }

    /// `(N, M)` pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.normal.iter().copied().zip(self.moment.iter().copied())
    }

    /// Largest sagging moment on the envelope
    pub fn max_moment(&self) -> f64 {
        self.moment.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Largest hogging moment on the envelope
    pub fn min_moment(&self) -> f64 {
        self.moment.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Most compressive axial force on the envelope
    pub fn min_normal(&self) -> f64 {
        self.normal.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Most tensile axial force on the envelope
    pub fn max_normal(&self) -> f64 {
        self.normal.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// One side of the envelope: `face` is the compressed extreme fiber.
struct PivotBranch {
    face: f64,
    far: f64,
    pivot: f64,
    y_ref: f64,
    limits: UltimateStrains,
}

impl PivotBranch {
    /// Ultimate plane at `t ∈ [0, 3]`.
    fn plane(&self, t: f64) -> StrainPlane {
        let UltimateStrains { eps_cu, eps_c2, eps_su } = self.limits;
        let through = |y1, e1, y2, e2| {
            let (e0, k) = plane_through(y1, e1, y2, e2, self.y_ref);
            StrainPlane::new(e0, k)
        };

        if t <= 1.0 {
            let face_strain = eps_su - (eps_cu + eps_su) * t;
            return through(self.pivot, eps_su, self.face, face_strain);
        }
        if t <= 2.0 {
            let s = t - 1.0;
            let depth = (self.face - self.far).abs();
            let pivot_depth = (self.face - self.pivot).abs();
            let far_start = -eps_cu + (eps_su + eps_cu) * depth / pivot_depth;
            return through(self.face, -eps_cu, self.far, far_start * (1.0 - s));
        }

        let s = (t - 2.0).min(1.0);
        let c = self.face + (self.far - self.face) * (1.0 - eps_c2 / eps_cu);
        if (c - self.face).abs() <= 1.0e-12 * (self.far - self.face).abs() {
            // εc2 = εcu: rotate about the face itself
            return through(self.face, -eps_cu, self.far, -eps_cu * s);
        }
        through(self.face, -eps_cu + (eps_cu - eps_c2) * s, c, -eps_c2)
    }
}

/// Trace the interaction envelope.
///
/// # Errors
///
/// `SectionUnstable` for a section without centroid or depth.
pub fn calculate(section: &Section, input: &InteractionInput, settings: &SolverSettings) -> SectionResult<InteractionResult> {
    input.validate()?;
    settings.validate()?;

    let y_ref = section.centroid()?.y;
    let (bottom, top) = section.extent()?;
    if !(top > bottom) {
        return Err(SectionError::unstable("section has no depth"));
    }
    let limits = UltimateStrains::of(section)?;
    let mid = 0.5 * (bottom + top);

    let reinforcement: Vec<f64> = section
        .geometries()
        .iter()
        .filter(|g| g.role() != GeometryRole::Concrete)
        .map(|g| g.centroid()[1])
        .collect();
    let lowest = reinforcement.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = reinforcement.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let sagging = PivotBranch {
        face: top,
        far: bottom,
        pivot: if lowest < mid { lowest } else { bottom },
        y_ref,
        limits,
    };
    let hogging = PivotBranch {
        face: bottom,
        far: top,
        pivot: if highest > mid { highest } else { top },
        y_ref,
        limits,
    };
    debug!(
        "interaction limits: eps_cu = {:.4e}, eps_c2 = {:.4e}, eps_su = {:.4e}",
        limits.eps_cu, limits.eps_c2, limits.eps_su
    );

    let n_points = input.points.unwrap_or(settings.interaction_points);
    let mut result = InteractionResult::default();
    for j in 0..n_points {
        let t = 6.0 * j as f64 / (n_points - 1) as f64;
        let plane = if t <= 3.0 { sagging.plane(t) } else { hogging.plane(6.0 - t) };
        let forces = section.integrate(&plane, y_ref);
        result.normal.push(forces.normal);
        result.moment.push(forces.moment);
        result.planes.push(plane);
    }

    info!(
        "interaction_curve: {} points, N in [{:.4e}, {:.4e}], M in [{:.4e}, {:.4e}]",
        result.len(),
        result.min_normal(),
        result.max_normal(),
        result.min_moment(),
        result.max_moment()
    );
    Ok(result)
}
