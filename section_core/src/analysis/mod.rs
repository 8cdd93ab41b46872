//! # Section Analyses
//!
//! Entry points that drive a [`Section`] to equilibrium or to its ultimate
//! limit states.
//!
//! ## Modules
//!
//! - [`check`] - Strain plane for prescribed `(N, M)`
//! - [`moment_curvature`] - Curvature sweep at constant axial force
//! - [`interaction`] - `N-M` capacity envelope
//!
//! Each module exposes an `*Input` type and a `calculate(section, input,
//! settings)` function. The free functions below wrap them with the
//! default [`SolverSettings`].
//!
//! ## Example
//!
//! ```rust
//! use section_core::analysis;
//! use section_core::section::Section;
//!
//! let json = r#"{
//!     "materials": [
//!         { "name": "C40", "type": "Concrete", "variables": { "fc": 40.0e6 } },
//!         { "name": "B400", "type": "SteelIdeal", "variables": { "young": 200.0e9, "fy": 400.0e6 } }
//!     ],
//!     "geometries": [
//!         { "type": "RectSection", "material": "C40", "center": [0.0, 0.25],
//!           "variables": { "width": 0.3, "height": 0.5 } },
//!         { "type": "Rebar", "material": "B400", "center": [-0.11, 0.04], "variables": { "diameter": 0.02 } },
//!         { "type": "Rebar", "material": "B400", "center": [0.11, 0.04], "variables": { "diameter": 0.02 } }
//!     ]
//! }"#;
//! let section = Section::from_json(json).unwrap();
//!
//! let plane = analysis::check_section(&section, -2.0e6, 4.0e5, 50).unwrap();
//! let forces = section.evaluate(&plane).unwrap();
//! assert!((forces.moment - 4.0e5).abs() < 10.0);
//! ```

pub mod check;
pub mod interaction;
pub mod moment_curvature;
mod newton;

pub use check::{CheckSectionInput, CheckSectionResult};
pub use interaction::{InteractionInput, InteractionResult, UltimateStrains};
pub use moment_curvature::{MomentCurvatureInput, MomentCurvatureResult};

use crate::errors::SectionResult;
use crate::section::{GeometryProperties, Section};
use crate::settings::SolverSettings;
use crate::state::StrainPlane;

/// Strain plane carrying `target_normal` and `target_moment`, found within
/// `n_ite` Newton iterations.
pub fn check_section(section: &Section, target_normal: f64, target_moment: f64, n_ite: usize) -> SectionResult<StrainPlane> {
    let input = CheckSectionInput::new(target_normal, target_moment).with_max_iterations(n_ite);
    check::calculate(section, &input, &SolverSettings::default()).map(|r| r.plane)
}

/// Moment-curvature sweep from zero to `k_max` at constant `normal_force`.
pub fn moment_curvature(section: &Section, k_max: f64, normal_force: f64) -> SectionResult<MomentCurvatureResult> {
    moment_curvature::calculate(
        section,
        &MomentCurvatureInput::new(k_max, normal_force),
        &SolverSettings::default(),
    )
}

/// Interaction envelope sampled at `n_points` ultimate planes.
pub fn interaction_curve(section: &Section, n_points: usize) -> SectionResult<InteractionResult> {
    interaction::calculate(section, &InteractionInput::new(n_points), &SolverSettings::default())
}

/// Centroid and areas grouped by role.
pub fn geometry_properties(section: &Section) -> SectionResult<GeometryProperties> {
    section.geometry_properties()
}
