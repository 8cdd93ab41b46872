//! # Section Check
//!
//! Finds the strain plane `(e0, k)` under which the section carries a
//! prescribed axial force and bending moment.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use section_core::analysis::check::{calculate, CheckSectionInput};
//! use section_core::geometry::{Rebar, RectSection};
//! use section_core::materials::{Concrete, Material, SteelIdeal};
//! use section_core::section::Section;
//! use section_core::settings::SolverSettings;
//!
//! let concrete = Arc::new(Material::Concrete(Concrete::new(40.0e6).unwrap()));
//! let steel = Arc::new(Material::SteelIdeal(SteelIdeal::new(200.0e9, 400.0e6).unwrap()));
//! let section = Section::new(vec![
//!     RectSection::new(concrete, [0.0, 0.25], 0.3, 0.5).unwrap().into(),
//!     Rebar::new(Arc::clone(&steel), [-0.11, 0.04], 0.02).unwrap().into(),
//!     Rebar::new(steel, [0.11, 0.04], 0.02).unwrap().into(),
//! ]);
//!
//! let input = CheckSectionInput::new(-1.0e6, 1.0e5);
//! let result = calculate(&section, &input, &SolverSettings::default()).unwrap();
//! assert!((result.forces.moment - 1.0e5).abs() < 10.0);
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::newton::EquilibriumProblem;
use crate::errors::{require_finite, SectionResult};
use crate::section::Section;
use crate::settings::{require_count, SolverSettings};
use crate::state::{SectionForces, StrainPlane};

/// Target resultants for a section check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckSectionInput {
    /// Axial force (N), tension positive
    pub target_normal: f64,

    /// Bending moment (N·m), sagging positive
    pub target_moment: f64,

    /// Iteration budget; `None` uses the solver settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,

    /// Starting plane; `None` starts from the unstrained state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_plane: Option<StrainPlane>,
}

impl CheckSectionInput {
    pub fn new(target_normal: f64, target_moment: f64) -> Self {
        CheckSectionInput {
            target_normal,
            target_moment,
            max_iterations: None,
            initial_plane: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn validate(&self) -> SectionResult<()> {
        require_finite("target_normal", self.target_normal)?;
        require_finite("target_moment", self.target_moment)?;
        if let Some(n) = self.max_iterations {
            require_count("max_iterations", n, 1)?;
        }
        if let Some(plane) = self.initial_plane {
            require_finite("initial_plane.e0", plane.e0)?;
            require_finite("initial_plane.k", plane.k)?;
        }
        Ok(())
    }
}

/// Equilibrium found by a section check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckSectionResult {
    /// Equilibrium strain plane
    pub plane: StrainPlane,

    /// Resultants actually produced by `plane`
    pub forces: SectionForces,

    /// Newton iterations used
    pub iterations: usize,

    /// Remaining axial force error (N)
    pub residual_normal: f64,

    /// Remaining moment error (N·m)
    pub residual_moment: f64,
}

/// Solve for the strain plane that carries the target resultants.
///
/// # Errors
///
/// - `SectionUnstable` for a section without centroid, a target axial force
///   outside the attainable range, a singular stiffness, an iterate past the
///   material failure strains, or a residual that stops dropping
/// - `ConvergenceFailure` when the budget runs out while the residual is
///   still dropping
pub fn calculate(section: &Section, input: &CheckSectionInput, settings: &SolverSettings) -> SectionResult<CheckSectionResult> {
    input.validate()?;
    settings.validate()?;

    let target = SectionForces::new(input.target_normal, input.target_moment);
    let max_iterations = input.max_iterations.unwrap_or(settings.max_iterations);
    let guess = input.initial_plane.unwrap_or_default();

    let outcome = EquilibriumProblem::new(section, target, settings)
        .and_then(|problem| problem.solve("check_section", guess, max_iterations));
    let state = match outcome {
        Ok(state) => state,
        Err(e) => {
            warn!("check_section N = {:.4e}, M = {:.4e} failed: {e}", target.normal, target.moment);
            return Err(e);
        }
    };

    let residual = state.forces - target;
    info!(
        "check_section converged in {} iterations: e0 = {:.6e}, k = {:.6e}",
        state.iterations, state.plane.e0, state.plane.k
    );
    Ok(CheckSectionResult {
        plane: state.plane,
        forces: state.forces,
        iterations: state.iterations,
        residual_normal: residual.normal,
        residual_moment: residual.moment,
    })
}
