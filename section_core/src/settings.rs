//! # Solver Settings
//!
//! Numerical controls shared by every analysis. All fields have defaults,
//! so a settings object can be deserialized from a partial JSON document.
//!
//! ```rust
//! use section_core::settings::SolverSettings;
//!
//! let settings: SolverSettings = serde_json::from_str(r#"{"tolerance": 1e-8}"#).unwrap();
//! assert_eq!(settings.tolerance, 1e-8);
//! assert_eq!(settings.max_iterations, 50);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, SectionError, SectionResult};

/// Newton solver and sweep controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Convergence threshold on the scaled residual (max norm)
    pub tolerance: f64,

    /// Iteration budget for a single equilibrium solve
    pub max_iterations: usize,

    /// Central-difference step on the scaled unknowns
    pub perturbation: f64,

    /// Upper bound on a single Newton update of any scaled unknown
    pub max_strain_step: f64,

    /// Maximum number of step halvings per iteration
    pub line_search_steps: usize,

    /// Extreme fiber strain beyond which an iterate is declared divergent.
    /// The section's material failure strain tightens it further.
    pub divergence_strain: f64,

    /// Number of curvature increments in a moment-curvature sweep
    pub curve_steps: usize,

    /// Number of sampled ultimate planes in an interaction envelope
    pub interaction_points: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            tolerance: 1.0e-6,
            max_iterations: 50,
            perturbation: 1.0e-7,
            max_strain_step: 5.0e-4,
            line_search_steps: 10,
            divergence_strain: 0.1,
            curve_steps: 50,
            interaction_points: 50,
        }
    }
}

impl SolverSettings {
    /// Same settings with a different iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Reject non-positive tolerances, steps, and counts.
    pub fn validate(&self) -> SectionResult<()> {
        require_positive("tolerance", self.tolerance)?;
        require_positive("perturbation", self.perturbation)?;
        require_positive("max_strain_step", self.max_strain_step)?;
        require_positive("divergence_strain", self.divergence_strain)?;
        require_count("max_iterations", self.max_iterations, 1)?;
        require_count("curve_steps", self.curve_steps, 1)?;
        require_count("interaction_points", self.interaction_points, 2)?;
        Ok(())
    }
}

pub(crate) fn require_count(field: &str, value: usize, minimum: usize) -> SectionResult<usize> {
    if value >= minimum {
        Ok(value)
    } else {
        Err(SectionError::invalid_input(
            field,
            value.to_string(),
            format!("Must be at least {minimum}"),
        ))
    }
}
