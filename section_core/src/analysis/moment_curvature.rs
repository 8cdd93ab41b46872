//! # Moment-Curvature
//!
//! Sweeps the curvature from zero to `k_max` in equal increments while
//! holding the axial force constant. At each increment the axial strain is
//! solved so the section carries the prescribed normal force, starting
//! from the previous increment's solution.
//!
//! A sweep that fails part-way stops at the last equilibrium point and
//! records why in [`MomentCurvatureResult::termination`]. Past the peak
//! moment this is the expected way for a sweep to end: crushed concrete
//! leaves no plane that carries the axial force.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::newton::EquilibriumProblem;
use crate::errors::{require_finite, SectionError, SectionResult};
use crate::section::Section;
use crate::settings::{require_count, SolverSettings};
use crate::state::SectionForces;

const ANALYSIS: &str = "moment_curvature";

/// Moment-curvature sweep parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentCurvatureInput {
    /// Final curvature (1/m); negative for a hogging sweep
    pub k_max: f64,

    /// Constant axial force (N), tension positive
    #[serde(default)]
    pub normal_force: f64,

    /// Number of increments; `None` uses the solver settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
}

impl MomentCurvatureInput {
    pub fn new(k_max: f64, normal_force: f64) -> Self {
        MomentCurvatureInput {
            k_max,
            normal_force,
            steps: None,
        }
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn validate(&self) -> SectionResult<()> {
        require_finite("k_max", self.k_max)?;
        require_finite("normal_force", self.normal_force)?;
        if let Some(steps) = self.steps {
            require_count("steps", steps, 1)?;
        }
        Ok(())
    }
}

/// Points of a moment-curvature sweep, in increasing curvature magnitude.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentCurvatureResult {
    /// Curvature at each point (1/m)
    pub curvature: Vec<f64>,

    /// Moment at each point (N·m)
    pub moment: Vec<f64>,

    /// Axial strain at the centroid at each point
    pub axial_strain: Vec<f64>,

    /// Why the sweep stopped before `k_max`, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<SectionError>,
}

impl MomentCurvatureResult {
    pub fn len(&self) -> usize {
        self.curvature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curvature.is_empty()
    }

    /// True when the sweep reached `k_max`
    pub fn is_complete(&self) -> bool {
        self.termination.is_none()
    }

    /// Fail with the termination cause of a truncated sweep.
    pub fn into_complete(self) -> SectionResult<Self> {
        match self.termination {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// `(curvature, moment)` pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.curvature.iter().copied().zip(self.moment.iter().copied())
    }

    /// Point with the largest moment magnitude
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points()
            .fold(None, |best: Option<(f64, f64)>, p| match best {
                Some(b) if b.1.abs() >= p.1.abs() => Some(b),
                _ => Some(p),
            })
    }

    fn push(&mut self, curvature: f64, moment: f64, axial_strain: f64) {
        self.curvature.push(curvature);
        self.moment.push(moment);
        self.axial_strain.push(axial_strain);
    }
}

/// Run a moment-curvature sweep.
///
/// # Errors
///
/// Fails outright when the input is invalid or the very first point has
/// no equilibrium. Later failures end the sweep and are reported in
/// `termination`.
pub fn calculate(
    section: &Section,
    input: &MomentCurvatureInput,
    settings: &SolverSettings,
) -> SectionResult<MomentCurvatureResult> {
    input.validate()?;
    settings.validate()?;

    let steps = if input.k_max == 0.0 {
        0
    } else {
        input.steps.unwrap_or(settings.curve_steps)
    };
    let target = SectionForces::new(input.normal_force, 0.0);
    let problem = EquilibriumProblem::new(section, target, settings)?;

    let mut result = MomentCurvatureResult::default();
    let mut e0 = 0.0;
    for i in 0..=steps {
        let k = if steps == 0 {
            0.0
        } else {
            input.k_max * i as f64 / steps as f64
        };
        match problem.solve_axial(ANALYSIS, k, e0, settings.max_iterations) {
            Ok(state) => {
                e0 = state.plane.e0;
                debug!(
                    "moment_curvature step {i}/{steps}: k = {k:.6e}, M = {:.6e} ({} iterations)",
                    state.forces.moment, state.iterations
                );
                result.push(k, state.forces.moment, e0);
            }
            Err(e) if i == 0 => {
                warn!("moment_curvature failed at zero curvature: {e}");
                return Err(e);
            }
            Err(e) => {
                warn!("moment_curvature stopped at step {i}/{steps} (k = {k:.6e}): {e}");
                result.termination = Some(e);
                break;
            }
        }
    }

    info!(
        "moment_curvature: {} points, N = {:.4e}, k_max = {:.4e}",
        result.len(),
        input.normal_force,
        input.k_max
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rebar, RectSection};
    use crate::materials::{Concrete, Material, SteelIdeal};
    use std::sync::Arc;

    fn beam() -> Section {
        let concrete = Arc::new(Material::Concrete(Concrete::new(40.0e6).unwrap()));
        let steel = Arc::new(Material::SteelIdeal(SteelIdeal::new(200.0e9, 400.0e6).unwrap()));
        Section::new(vec![
            RectSection::new(concrete, [0.0, 0.25], 0.3, 0.5).unwrap().into(),
            Rebar::new(Arc::clone(&steel), [-0.11, 0.04], 0.02).unwrap().into(),
            Rebar::new(steel, [0.11, 0.04], 0.02).unwrap().into(),
        ])
    }

    #[test]
    fn test_zero_curvature_single_point() {
        let result = calculate(&beam(), &MomentCurvatureInput::new(0.0, 0.0), &SolverSettings::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.curvature[0], 0.0);
        assert!(result.moment[0].abs() < 1.0e-6);
        assert!(result.is_complete());
    }

    #[test]
    fn test_full_sweep_point_count() {
        let input = MomentCurvatureInput::new(0.0125, -2.0e6);
        let result = calculate(&beam(), &input, &SolverSettings::default()).unwrap();
        assert!(result.is_complete());
        assert_eq!(result.len(), 51);
        assert!((result.curvature[50] - 0.0125).abs() < 1.0e-15);
        let (_, peak) = result.peak().unwrap();
        assert!(peak > 3.5e5 && peak < 4.2e5);
        // Monotonic before the peak
        assert!(result.moment[10] < result.moment[20]);
    }

    #[test]
    fn test_custom_steps_and_hogging() {
        let input = MomentCurvatureInput::new(-0.004, -1.0e6).with_steps(8);
        let result = calculate(&beam(), &input, &SolverSettings::default()).unwrap();
        assert_eq!(result.len(), 9);
        assert!(result.moment[8] < -1.0e5);
    }

    #[test]
    fn test_softening_terminates_sweep() {
        let input = MomentCurvatureInput::new(0.06, -2.0e6);
        let result = calculate(&beam(), &input, &SolverSettings::default()).unwrap();
        assert!(!result.is_complete());
        assert!(result.len() > 1 && result.len() < 51);
        assert_eq!(result.len(), result.moment.len());
        assert!(result.clone().into_complete().is_err());
    }

    #[test]
    fn test_invalid_input() {
        let settings = SolverSettings::default();
        assert!(calculate(&beam(), &MomentCurvatureInput::new(f64::INFINITY, 0.0), &settings).is_err());
        let input = MomentCurvatureInput::new(0.01, 0.0).with_steps(0);
        assert!(calculate(&beam(), &input, &settings).is_err());
    }

    #[test]
    fn test_unreachable_axial_force() {
        let err = calculate(&beam(), &MomentCurvatureInput::new(0.01, -1.0e7), &SolverSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "SECTION_UNSTABLE");
    }
}
